//! HobbyApp application layer
//!
//! Stores hold the reactive client state, use cases compose them with the
//! API boundary. Nothing here knows which storage backend or API mode is
//! live; both arrive as ports through [`AppDeps`].

pub mod app;
pub mod deps;
pub mod kv_store;
pub mod preferences;
pub mod stores;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{App, AppOptions};
pub use deps::AppDeps;
pub use kv_store::PersistentStore;
pub use preferences::PreferencesService;
pub use stores::{CommunityState, CommunityStore, MapState, MapStore, SessionStore};
