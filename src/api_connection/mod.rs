pub mod connection;
pub mod endpoints;
pub mod food_facts;
pub mod recognition;

pub use connection::ApiConnectionError;
pub use food_facts::{FoodFactsLookup, OpenFoodFactsClient};
pub use recognition::{RecognitionClient, RecognitionOutcome};
