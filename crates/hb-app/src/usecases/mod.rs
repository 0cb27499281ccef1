//! Use cases
//!
//! Each use case composes the API boundary with one or both stores and
//! owns the ordering "API call → store mutation → flush".

pub mod auth;
pub mod communities;
pub mod nearby;
pub mod onboarding;
pub mod restore_session;

pub use auth::AuthOrchestrator;
pub use communities::{
    CommunityActionError, CommunityMembership, CreateCommunity, LoadCommunities, MembershipChange,
};
pub use nearby::{LoadNearbyUsers, NearbyError};
pub use onboarding::{CompleteOnboarding, OnboardingError};
pub use restore_session::RestoreSession;
