//! API boundary ports
//!
//! The backend is reached through four namespaces: auth, communities,
//! users and comments. Each is its own trait so adapters and tests can be
//! read one concern at a time; [`HobbyApiPort`] bundles them for the
//! application layer, which injects a single implementation (mock or
//! HTTP) at start-up.
//!
//! Every failure surfaces as [`ApiError`] and is never retried here.

use std::path::Path;

use async_trait::async_trait;

use crate::comment::{ActionAck, Comment};
use crate::community::{Community, CommunityFilter, NewCommunity};
use crate::geo::GeoPoint;
use crate::ports::errors::ApiError;
use crate::user::{AuthResponse, AvatarUpload, ProfileUpdate, SignUpRequest, TokenRefresh, User};

/// Radius used by the nearby-users lookup when the caller has no preference.
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 5_000.0;

#[async_trait]
pub trait AuthApiPort: Send + Sync {
    /// Reload the bearer token from persistent storage.
    async fn init(&self) -> Result<(), ApiError>;

    /// Authenticate. On success the returned token (if any) is persisted,
    /// otherwise any stored token is cleared.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    /// Register. Token handling matches [`AuthApiPort::sign_in`].
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError>;

    /// Forget the persisted token. Never fails; storage problems are logged.
    async fn sign_out(&self);

    async fn refresh_token(&self) -> Result<TokenRefresh, ApiError>;
}

#[async_trait]
pub trait CommunityApiPort: Send + Sync {
    async fn list_communities(&self, filter: &CommunityFilter)
        -> Result<Vec<Community>, ApiError>;

    async fn get_community(&self, id: &str) -> Result<Option<Community>, ApiError>;

    /// Does not promise to update any local member count.
    async fn join_community(&self, id: &str) -> Result<ActionAck, ApiError>;

    async fn leave_community(&self, id: &str) -> Result<ActionAck, ApiError>;

    async fn create_community(&self, community: &NewCommunity) -> Result<Community, ApiError>;
}

#[async_trait]
pub trait UserApiPort: Send + Sync {
    async fn nearby_users(&self, location: GeoPoint, radius_m: f64)
        -> Result<Vec<User>, ApiError>;

    /// Profile of the authenticated user.
    async fn get_profile(&self) -> Result<User, ApiError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError>;

    /// Server-side partial update. The response may omit fields.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;

    async fn upload_avatar(&self, image_path: &Path) -> Result<AvatarUpload, ApiError>;
}

#[async_trait]
pub trait CommentApiPort: Send + Sync {
    async fn list_comments(&self, community_id: &str) -> Result<Vec<Comment>, ApiError>;

    async fn create_comment(&self, community_id: &str, text: &str) -> Result<Comment, ApiError>;

    async fn like_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError>;

    async fn delete_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError>;
}

/// The whole API boundary.
pub trait HobbyApiPort: AuthApiPort + CommunityApiPort + UserApiPort + CommentApiPort {}

impl<T> HobbyApiPort for T where T: AuthApiPort + CommunityApiPort + UserApiPort + CommentApiPort {}
