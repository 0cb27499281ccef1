//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (stores and
//! use cases) and infrastructure implementations. The core stays
//! independent of device storage and of whichever backend is live.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port here, ask:
//!
//! 1. **Does this port represent a business capability?**
//! 2. **Will it be depended upon by multiple use cases or stores?**
//! 3. **Is it implemented by the infrastructure layer?**
//!
//! If all three answers are **yes**, place it in `hb-core/ports`.

pub mod api;
mod clock;
pub mod errors;
pub mod key_value;

pub use api::{AuthApiPort, CommentApiPort, CommunityApiPort, HobbyApiPort, UserApiPort};
pub use clock::*;
pub use errors::{ApiError, StorageError};
pub use key_value::KeyValueStorePort;
