pub mod api_connection;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod render;
pub mod report_aggregator;
pub mod resolver;
