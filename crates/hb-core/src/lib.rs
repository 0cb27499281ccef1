//! # hb-core
//!
//! Core domain models and port interfaces for HobbyApp.
//!
//! This crate contains pure domain data and the contracts the application
//! layer depends on. It performs no I/O of its own.

// Public module exports
pub mod comment;
pub mod community;
pub mod config;
pub mod geo;
pub mod interests;
pub mod ports;
pub mod preferences;
pub mod session;
pub mod storage_keys;
pub mod user;

// Re-export commonly used types at the crate root
pub use comment::{ActionAck, Comment};
pub use community::{Community, CommunityFilter, CommunityLocation, NewCommunity};
pub use config::AppConfig;
pub use geo::GeoPoint;
pub use session::{SessionPhase, SessionSnapshot, SessionState};
pub use user::{AuthResponse, ProfileUpdate, SignUpRequest, User, UserLocation};
