use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use hb_core::ports::{
    ApiError, AuthApiPort, ClockPort, CommentApiPort, CommunityApiPort, KeyValueStorePort,
    StorageError, UserApiPort,
};
use hb_core::user::{AvatarUpload, TokenRefresh};
use hb_core::{
    ActionAck, AuthResponse, Comment, Community, CommunityFilter, CommunityLocation, GeoPoint,
    NewCommunity, ProfileUpdate, SignUpRequest, User,
};
use hb_infra::InMemoryKeyValueStore;

mockall::mock! {
    pub Api {}

    #[async_trait]
    impl AuthApiPort for Api {
        async fn init(&self) -> Result<(), ApiError>;
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
        async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError>;
        async fn sign_out(&self);
        async fn refresh_token(&self) -> Result<TokenRefresh, ApiError>;
    }

    #[async_trait]
    impl CommunityApiPort for Api {
        async fn list_communities(&self, filter: &CommunityFilter) -> Result<Vec<Community>, ApiError>;
        async fn get_community(&self, id: &str) -> Result<Option<Community>, ApiError>;
        async fn join_community(&self, id: &str) -> Result<ActionAck, ApiError>;
        async fn leave_community(&self, id: &str) -> Result<ActionAck, ApiError>;
        async fn create_community(&self, community: &NewCommunity) -> Result<Community, ApiError>;
    }

    #[async_trait]
    impl UserApiPort for Api {
        async fn nearby_users(&self, location: GeoPoint, radius_m: f64) -> Result<Vec<User>, ApiError>;
        async fn get_profile(&self) -> Result<User, ApiError>;
        async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError>;
        async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;
        async fn upload_avatar(&self, image_path: &Path) -> Result<AvatarUpload, ApiError>;
    }

    #[async_trait]
    impl CommentApiPort for Api {
        async fn list_comments(&self, community_id: &str) -> Result<Vec<Comment>, ApiError>;
        async fn create_comment(&self, community_id: &str, text: &str) -> Result<Comment, ApiError>;
        async fn like_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError>;
        async fn delete_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError>;
    }
}

pub(crate) fn memory_kv() -> Arc<dyn KeyValueStorePort> {
    Arc::new(InMemoryKeyValueStore::new())
}

/// Every operation fails as if the device storage were unavailable.
pub(crate) struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStorePort for FailingKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::read(key, "device unavailable"))
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::write(key, "device unavailable"))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        Err(StorageError::write(key, "device unavailable"))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::write("*", "device unavailable"))
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Err(StorageError::read("*", "device unavailable"))
    }
}

/// Delegates to `inner` but refuses every write to `key`.
pub(crate) struct FailingWritesTo {
    inner: Arc<dyn KeyValueStorePort>,
    key: &'static str,
}

impl FailingWritesTo {
    pub(crate) fn new(inner: Arc<dyn KeyValueStorePort>, key: &'static str) -> Self {
        Self { inner, key }
    }
}

#[async_trait]
impl KeyValueStorePort for FailingWritesTo {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.key {
            return Err(StorageError::write(key, "disk full"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear().await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys().await
    }
}

pub(crate) struct ManualClock(AtomicI64);

impl ManualClock {
    pub(crate) fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub(crate) fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) fn user(id: &str, is_onboarded: Option<bool>) -> User {
    User {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        avatar: None,
        bio: None,
        interests: vec![],
        joined_communities: vec![],
        is_onboarded,
        location: None,
    }
}

pub(crate) fn community(id: &str, member_count: u32, is_joined: Option<bool>) -> Community {
    Community {
        id: id.to_string(),
        title: format!("Community {id}"),
        description: String::new(),
        image: String::new(),
        tags: vec![],
        member_count,
        category: "Art".to_string(),
        created_by: "user1".to_string(),
        created_at: Utc::now(),
        location: CommunityLocation::default(),
        distance: None,
        is_joined,
    }
}
