//! The two API boundary implementations.
//!
//! [`MockHobbyApi`] serves seeded data from memory, [`HttpHobbyApi`] talks
//! to a live backend. Both persist the bearer token under the same storage
//! key so session rehydration behaves identically in either mode.

mod http;
mod mock;
mod mock_data;
mod token;

pub use http::HttpHobbyApi;
pub use mock::{MockHobbyApi, DEMO_EMAIL, DEMO_PASSWORD};
