//! HobbyApp bootstrap: configuration loading, tracing and dependency
//! wiring shared by the command-line front end and the integration tests.

pub mod bootstrap;

pub use bootstrap::config::load_config;
pub use bootstrap::wiring::{build_app, ApiMode, StorageBackend, WiredApp};
