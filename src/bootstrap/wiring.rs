//! Turns an [`AppConfig`] into a running [`App`].
//!
//! This is where configuration values get interpreted: unknown API modes
//! fall back to the mock, an empty data directory falls back to the
//! platform default.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

use hb_app::{App, AppDeps, AppOptions};
use hb_core::config::AppConfig;
use hb_core::ports::{ClockPort, HobbyApiPort, KeyValueStorePort};
use hb_infra::{FileKeyValueStore, HttpHobbyApi, InMemoryKeyValueStore, MockHobbyApi, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    Mock,
    Http,
}

impl ApiMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "mock" => Self::Mock,
            "http" | "live" => Self::Http,
            other => {
                warn!(mode = other, "unknown api mode, using mock");
                Self::Mock
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

impl StorageBackend {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "file" => Self::File,
            "memory" => Self::Memory,
            other => {
                warn!(backend = other, "unknown storage backend, using file");
                Self::File
            }
        }
    }
}

pub struct WiredApp {
    pub app: App,
    pub api_mode: ApiMode,
    pub storage_backend: StorageBackend,
    pub data_root: PathBuf,
}

/// Suffixes the data directory so several profiles can coexist on one
/// machine.
pub const PROFILE_ENV: &str = "HOBBYAPP_PROFILE";

const DATA_DIR_NAME: &str = "hobbyapp";

/// Pick the data root: the configured directory if any, else
/// `<platform_dir>/hobbyapp[-<profile>]`.
pub fn resolve_data_root(
    config: &AppConfig,
    platform_dir: Option<PathBuf>,
    profile: Option<&str>,
) -> anyhow::Result<PathBuf> {
    if !config.storage_data_dir.as_os_str().is_empty() {
        return Ok(config.storage_data_dir.clone());
    }
    let base = platform_dir.context("Failed to resolve the platform data directory")?;
    let name = match profile.map(str::trim).filter(|p| !p.is_empty()) {
        Some(profile) => format!("{DATA_DIR_NAME}-{profile}"),
        None => DATA_DIR_NAME.to_string(),
    };
    Ok(base.join(name))
}

pub fn default_data_root(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let profile = std::env::var(PROFILE_ENV).ok();
    resolve_data_root(config, dirs::data_local_dir(), profile.as_deref())
}

pub fn build_app(config: &AppConfig, data_root: &Path) -> anyhow::Result<WiredApp> {
    let api_mode = ApiMode::parse(&config.api_mode);
    let storage_backend = StorageBackend::parse(&config.storage_backend);

    let kv: Arc<dyn KeyValueStorePort> = match storage_backend {
        StorageBackend::File => Arc::new(FileKeyValueStore::with_defaults(data_root)),
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
    };
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let api: Arc<dyn HobbyApiPort> = match api_mode {
        ApiMode::Mock => Arc::new(
            MockHobbyApi::new(kv.clone(), clock.clone(), config.mock_seed)
                .with_latency(Duration::from_millis(config.mock_latency_ms)),
        ),
        ApiMode::Http => {
            if config.api_base_url.trim().is_empty() {
                bail!("api.base_url must be set in http mode");
            }
            Arc::new(
                HttpHobbyApi::new(&config.api_base_url, kv.clone())
                    .context("Failed to create HTTP API client")?,
            )
        }
    };

    info!(
        ?api_mode,
        ?storage_backend,
        data_root = %data_root.display(),
        "wiring app"
    );

    let app = App::new(
        AppDeps { kv, api, clock },
        AppOptions {
            sign_up_sets_interests: config.sign_up_sets_interests,
        },
    );

    Ok(WiredApp {
        app,
        api_mode,
        storage_backend,
        data_root: data_root.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_mode_falls_back_to_mock() {
        assert_eq!(ApiMode::parse("http"), ApiMode::Http);
        assert_eq!(ApiMode::parse(" HTTP "), ApiMode::Http);
        assert_eq!(ApiMode::parse(""), ApiMode::Mock);
        assert_eq!(ApiMode::parse("grpc"), ApiMode::Mock);
    }

    #[test]
    fn storage_backend_falls_back_to_file() {
        assert_eq!(StorageBackend::parse("memory"), StorageBackend::Memory);
        assert_eq!(StorageBackend::parse(""), StorageBackend::File);
        assert_eq!(StorageBackend::parse("sqlite"), StorageBackend::File);
    }

    #[test]
    fn configured_data_dir_wins() {
        let mut config = AppConfig::empty();
        config.storage_data_dir = PathBuf::from("/srv/hobbyapp");

        let root = resolve_data_root(&config, None, Some("dev")).unwrap();

        assert_eq!(root, PathBuf::from("/srv/hobbyapp"));
    }

    #[test]
    fn empty_data_dir_uses_platform_dir() {
        let config = AppConfig::empty();

        let root = resolve_data_root(&config, Some("/data".into()), None).unwrap();
        let err = resolve_data_root(&config, None, None).unwrap_err();

        assert_eq!(root, PathBuf::from("/data/hobbyapp"));
        assert!(err.to_string().contains("platform data directory"));
    }

    #[test]
    fn profile_gets_its_own_data_dir() {
        let config = AppConfig::empty();

        let a = resolve_data_root(&config, Some("/data".into()), Some("a")).unwrap();
        let blank = resolve_data_root(&config, Some("/data".into()), Some("  ")).unwrap();

        assert_eq!(a, PathBuf::from("/data/hobbyapp-a"));
        assert_eq!(blank, PathBuf::from("/data/hobbyapp"));
    }

    #[test]
    fn http_mode_requires_base_url() {
        let mut config = AppConfig::empty();
        config.api_mode = "http".to_string();
        let dir = tempfile::tempdir().unwrap();

        let err = build_app(&config, dir.path()).err().unwrap();

        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn http_mode_with_base_url_wires() {
        let mut config = AppConfig::empty();
        config.api_mode = "http".to_string();
        config.api_base_url = "https://api.example.com".to_string();
        config.storage_backend = "memory".to_string();
        let dir = tempfile::tempdir().unwrap();

        let wired = build_app(&config, dir.path()).unwrap();

        assert_eq!(wired.api_mode, ApiMode::Http);
        assert_eq!(wired.storage_backend, StorageBackend::Memory);
    }
}
