use anyhow::{Context, Result};
use food_scanner::api_connection::recognition::decode_visualization;
use food_scanner::cli::{parse_args, Command};
use food_scanner::config::AppConfig;
use food_scanner::models::RawDetection;
use food_scanner::pipeline::FoodScanner;
use food_scanner::render::{render_catalog, render_report, render_text_lookup};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn annotated_path(photo_path: &Path) -> PathBuf {
    let stem = photo_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    photo_path.with_file_name(format!("{}.annotated.jpg", stem))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli_args = parse_args();
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let scanner = FoodScanner::from_config(&config)?;

    match cli_args.command {
        Command::Photo { path } => {
            let image = fs::read(&path)
                .await
                .with_context(|| format!("Failed to read image file '{}'", path.display()))?;
            log::info!("Analyzing photo {} ({} bytes)", path.display(), image.len());

            let analysis = scanner.analyze_photo(&image).await;

            if let Some(image_bytes) = analysis.visualization.as_deref().and_then(decode_visualization) {
                let out_path = annotated_path(&path);
                match fs::write(&out_path, image_bytes).await {
                    Ok(()) => log::info!("Annotated photo written to {}", out_path.display()),
                    Err(e) => log::warn!("Could not write annotated photo: {}", e),
                }
            }

            if cli_args.json {
                print_json(&analysis.report)?;
            } else {
                println!("{}", render_report(&analysis.report));
            }
        }
        Command::Detections { path } => {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read detections file '{}'", path.display()))?;
            let raw: Vec<RawDetection> = serde_json::from_str(&content)
                .with_context(|| format!("Detections file '{}' is not a JSON list of {{label, confidence}}", path.display()))?;

            let report = scanner.analyze_detections(&raw).await;
            if cli_args.json {
                print_json(&report)?;
            } else {
                println!("{}", render_report(&report));
            }
        }
        Command::Lookup { query, grams } => {
            let lookup = scanner.lookup_text(&query);
            if cli_args.json {
                print_json(&lookup)?;
            } else {
                println!("{}", render_text_lookup(&query, &lookup, grams));
            }
        }
        Command::List => {
            if cli_args.json {
                print_json(&scanner.catalog().entries())?;
            } else {
                println!("{}", render_catalog(scanner.catalog()));
            }
        }
    }

    Ok(())
}
