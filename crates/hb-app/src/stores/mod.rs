//! Reactive client state.
//!
//! Stores are plain values created at start-up and handed to whoever
//! needs them; readers subscribe through a `watch` channel.

mod community;
mod map;
mod session;

pub use community::{CommunityState, CommunityStore};
pub use map::{MapState, MapStore};
pub use session::SessionStore;
