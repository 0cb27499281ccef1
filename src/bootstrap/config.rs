//! # Configuration Loader
//!
//! ## Responsibilities
//!
//! - Read TOML configuration files
//! - Parse TOML into the [`AppConfig`] DTO
//! - Report I/O and parsing errors with context
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No default value logic
//!
//! Interpreting the values happens in [`wiring`](super::wiring).

use std::path::Path;

use anyhow::Context;
use hb_core::config::AppConfig;

/// Environment variable that overrides `api.base_url`.
pub const API_BASE_URL_ENV: &str = "HOBBYAPP_API_BASE_URL";

/// Load configuration from a TOML file.
///
/// Empty strings and missing sections are accepted as facts.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Load the file if one was given, otherwise start from an empty config,
/// then apply environment overrides.
pub fn load_effective_config(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => AppConfig::empty(),
    };
    apply_env_overrides(&mut config, std::env::var(API_BASE_URL_ENV).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig, base_url: Option<String>) {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.api_base_url = url;
    }
}
