//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.
//! A missing file is not an error — defaults apply.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// Falls back to [`AppConfig::default`] when the file doesn't exist.
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).with_context(|| "Failed to parse config.toml")?
  } else {
    AppConfig::default()
  };

  validate_config(&config)?;

  info!(
    name = %config.app.name,
    data_dir = %config.store.data_dir,
    seed = config.seed.enabled,
    "Configuration loaded"
  );

  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(!config.app.name.is_empty(), "app.name must not be empty");

  anyhow::ensure!(
    matches!(
      config.app.log_level.as_str(),
      "trace" | "debug" | "info" | "warn" | "error"
    ),
    "app.log_level must be one of trace/debug/info/warn/error, got {}",
    config.app.log_level
  );

  anyhow::ensure!(
    !config.store.data_dir.is_empty(),
    "store.data_dir must not be empty"
  );

  if config.seed.enabled {
    anyhow::ensure!(
      !config.seed.demo_password.is_empty(),
      "seed.demo_password must not be empty when seeding is enabled"
    );
  }

  Ok(())
}
