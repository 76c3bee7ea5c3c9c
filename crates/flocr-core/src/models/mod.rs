//! Data models and configuration.

pub mod config;
pub mod flight;

pub use config::FlocrConfig;
pub use flight::FlightRecord;
