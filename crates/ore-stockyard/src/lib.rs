pub mod config;
pub mod error;
pub mod stockyard;
pub mod telemetry;
