use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::render::EXAMPLE_PORTION_G;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate nutrition from a food photo or name", long_about = None)]
pub struct Cli {
    /// Print structured JSON instead of a text reply
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recognize food in an image file and report its nutrition
    Photo {
        /// Path to the image
        path: PathBuf,
    },
    /// Run the pipeline on a JSON array of {"label", "confidence"} detections
    Detections {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Look up a food by name
    Lookup {
        /// Food name, English key or display name
        query: String,
        /// Portion weight for the worked example
        #[arg(short, long, default_value_t = EXAMPLE_PORTION_G)]
        grams: f32,
    },
    /// List every food in the catalog
    List,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
