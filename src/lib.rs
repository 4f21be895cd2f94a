pub mod aggregator;
pub mod config;
pub mod fetch;
pub mod plan;
pub mod render;
pub mod server;
pub mod sim;
pub mod stats;
