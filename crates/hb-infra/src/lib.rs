//! Infrastructure adapters for HobbyApp: device storage, the two API
//! implementations, and the system clock.

pub mod api;
pub mod kv;
pub mod time;

pub use api::{HttpHobbyApi, MockHobbyApi};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::SystemClock;
