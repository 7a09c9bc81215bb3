//! Configuration Module - TOML-based Platform Data-Core Configuration
//!
//! Loads configuration from `config.toml`. Everything has a sensible
//! default so the binary also runs with no file at all (fresh demo
//! setup); the store path is never hardcoded outside this module.

pub mod loader;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Service identity and logging.
  pub app: AppSettings,
  /// Persisted store location.
  pub store: StoreConfig,
  /// Demo-data seeding.
  pub seed: SeedConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      app: AppSettings::default(),
      store: StoreConfig::default(),
      seed: SeedConfig::default(),
    }
  }
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      name: "learnhub-core".to_string(),
      log_level: "info".to_string(),
    }
  }
}

/// Persisted store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Directory holding `db.json`.
  pub data_dir: String,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      data_dir: "data".to_string(),
    }
  }
}

/// Demo-data seeding configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  /// Seed demo accounts and courses when the store is empty.
  pub enabled: bool,
  /// Password assigned to every seeded demo account.
  pub demo_password: String,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      demo_password: "password123".to_string(),
    }
  }
}
