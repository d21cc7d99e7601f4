pub mod config;
pub mod feed_client;
pub mod telemetry_dashboard;
