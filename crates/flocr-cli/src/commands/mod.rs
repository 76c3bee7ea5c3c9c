//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod output;
pub mod parse;

use std::path::Path;

use flocr_core::models::config::FlocrConfig;

/// Load the configuration file given with `--config`, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FlocrConfig> {
    match config_path {
        Some(path) => FlocrConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e)),
        None => Ok(FlocrConfig::default()),
    }
}
