//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No business logic or policies
//! - No validation logic
//! - No default value calculation
//!
//! Interpreting these values (which API mode to run, where the data root
//! lives when `storage_data_dir` is empty) belongs to the bootstrap wiring.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API mode as written in the file (`"mock"`, `"http"`, or anything else)
    pub api_mode: String,

    /// Base URL of the live API (may be empty - this is a fact, not an error)
    pub api_base_url: String,

    /// Simulated latency applied by the mock API to every call
    pub mock_latency_ms: u64,

    /// Seed for the mock API's pseudo-random data
    pub mock_seed: u64,

    /// Storage backend as written in the file (`"file"`, `"memory"`, ...)
    pub storage_backend: String,

    /// Data directory (path info only, no existence check)
    pub storage_data_dir: PathBuf,

    /// Whether sign-up commits the interests it carries and skips onboarding
    pub sign_up_sets_interests: bool,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let section_str = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let section_int = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
        };

        Ok(Self {
            api_mode: section_str("api", "mode"),
            api_base_url: section_str("api", "base_url"),
            mock_latency_ms: section_int("api", "mock_latency_ms") as u64,
            mock_seed: section_int("api", "mock_seed") as u64,
            storage_backend: section_str("storage", "backend"),
            storage_data_dir: PathBuf::from(section_str("storage", "data_dir")),
            sign_up_sets_interests: toml_value
                .get("onboarding")
                .and_then(|o| o.get("sign_up_sets_interests"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    /// Create an empty AppConfig
    ///
    /// **Note**: This is a pure data constructor, "empty" is a valid fact.
    pub fn empty() -> Self {
        Self {
            api_mode: String::new(),
            api_base_url: String::new(),
            mock_latency_ms: 0,
            mock_seed: 0,
            storage_backend: String::new(),
            storage_data_dir: PathBuf::new(),
            sign_up_sets_interests: false,
        }
    }
}
