//! # Application Dependencies
//!
//! Parameter grouping for [`App`](crate::App) construction. Not a builder:
//! no defaults, no hidden logic, every port is required.

use std::sync::Arc;

use hb_core::ports::{ClockPort, HobbyApiPort, KeyValueStorePort};

pub struct AppDeps {
    /// Device storage shared by the session and preferences.
    pub kv: Arc<dyn KeyValueStorePort>,
    /// Whichever API boundary is live (mock or HTTP).
    pub api: Arc<dyn HobbyApiPort>,
    pub clock: Arc<dyn ClockPort>,
}
