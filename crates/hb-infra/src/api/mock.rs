//! In-memory API boundary with seeded data.
//!
//! Every operation succeeds after an optional simulated delay, except
//! sign-in with anything other than the demo credentials. Mutations
//! (join, leave, create, profile updates, comments) only live as long as
//! this instance.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hb_core::ports::{
    ApiError, AuthApiPort, ClockPort, CommentApiPort, CommunityApiPort, KeyValueStorePort,
    UserApiPort,
};
use hb_core::user::{AvatarUpload, TokenRefresh};
use hb_core::{
    ActionAck, AuthResponse, Comment, Community, CommunityFilter, CommunityLocation, GeoPoint,
    NewCommunity, ProfileUpdate, SignUpRequest, User, UserLocation,
};

use super::mock_data::{self, picsum, timestamp, LA_ADDRESS, LA_LATITUDE, LA_LONGITUDE};
use super::token::BearerToken;

pub const DEMO_EMAIL: &str = "demo@hobbyapp.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Half-width, in degrees, of the box new communities are placed in.
const LOCATION_JITTER_DEG: f64 = 0.05;
const MAX_MOCK_DISTANCE_M: u32 = 5_000;

struct MockState {
    communities: Vec<Community>,
    users: Vec<User>,
    comments: HashMap<String, Vec<Comment>>,
    current_user_id: Option<String>,
    rng: StdRng,
}

impl MockState {
    fn current_user(&self) -> Option<&User> {
        let id = self.current_user_id.as_deref()?;
        self.users.iter().find(|u| u.id == id)
    }

    fn current_user_mut(&mut self) -> Option<&mut User> {
        let index = match self.current_user_id.as_deref() {
            Some(id) => self.users.iter().position(|u| u.id == id)?,
            None => 0,
        };
        self.users.get_mut(index)
    }

    fn community_mut(&mut self, id: &str) -> Option<&mut Community> {
        self.communities.iter_mut().find(|c| c.id == id)
    }
}

pub struct MockHobbyApi {
    state: Mutex<MockState>,
    token: BearerToken,
    clock: Arc<dyn ClockPort>,
    latency: Duration,
}

impl MockHobbyApi {
    pub fn new(kv: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>, seed: u64) -> Self {
        Self {
            state: Mutex::new(MockState {
                communities: mock_data::communities(),
                users: mock_data::users(),
                comments: HashMap::new(),
                current_user_id: None,
                rng: StdRng::seed_from_u64(seed),
            }),
            token: BearerToken::new(kv),
            clock,
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency` to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn mock_token(&self) -> String {
        format!("mock_token_{}", self.clock.now_ms())
    }
}

#[async_trait]
impl AuthApiPort for MockHobbyApi {
    async fn init(&self) -> Result<(), ApiError> {
        self.token.load().await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.simulate_latency().await;

        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            debug!(email, "mock sign-in rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let user = {
            let mut state = self.state.lock().await;
            let user = state
                .users
                .first()
                .cloned()
                .ok_or_else(|| ApiError::Decode("mock user table is empty".to_string()))?;
            state.current_user_id = Some(user.id.clone());
            user
        };

        let token = self.mock_token();
        self.token.store(Some(&token)).await?;
        info!(user_id = %user.id, "mock sign-in succeeded");
        Ok(AuthResponse {
            token: Some(token),
            user,
        })
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        self.simulate_latency().await;

        let now_ms = self.clock.now_ms();
        let user = User {
            id: format!("user_{now_ms}"),
            name: request.name.clone(),
            email: request.email.clone(),
            avatar: Some(picsum("100/100", now_ms)),
            bio: None,
            interests: request.interests.clone(),
            joined_communities: Vec::new(),
            is_onboarded: None,
            location: Some(UserLocation {
                latitude: LA_LATITUDE,
                longitude: LA_LONGITUDE,
                city: LA_ADDRESS.to_string(),
            }),
        };

        {
            let mut state = self.state.lock().await;
            state.users.push(user.clone());
            state.current_user_id = Some(user.id.clone());
        }

        let token = self.mock_token();
        self.token.store(Some(&token)).await?;
        info!(user_id = %user.id, "mock sign-up succeeded");
        Ok(AuthResponse {
            token: Some(token),
            user,
        })
    }

    async fn sign_out(&self) {
        self.simulate_latency().await;
        self.state.lock().await.current_user_id = None;
        if let Err(e) = self.token.clear().await {
            warn!(error = %e, "failed to clear stored token on sign-out");
        }
    }

    async fn refresh_token(&self) -> Result<TokenRefresh, ApiError> {
        self.simulate_latency().await;
        let token = self.mock_token();
        self.token.store(Some(&token)).await?;
        Ok(TokenRefresh { token })
    }
}

#[async_trait]
impl CommunityApiPort for MockHobbyApi {
    async fn list_communities(
        &self,
        filter: &CommunityFilter,
    ) -> Result<Vec<Community>, ApiError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state
            .communities
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_community(&self, id: &str) -> Result<Option<Community>, ApiError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state.communities.iter().find(|c| c.id == id).cloned())
    }

    async fn join_community(&self, id: &str) -> Result<ActionAck, ApiError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        match state.community_mut(id) {
            Some(community) => {
                community.is_joined = Some(true);
                community.member_count += 1;
            }
            None => debug!(community_id = id, "mock join of unknown community"),
        }
        Ok(ActionAck::ok())
    }

    async fn leave_community(&self, id: &str) -> Result<ActionAck, ApiError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        match state.community_mut(id) {
            Some(community) => {
                community.is_joined = Some(false);
                community.member_count = community.member_count.saturating_sub(1);
            }
            None => debug!(community_id = id, "mock leave of unknown community"),
        }
        Ok(ActionAck::ok())
    }

    async fn create_community(&self, new: &NewCommunity) -> Result<Community, ApiError> {
        self.simulate_latency().await;
        let now_ms = self.clock.now_ms();
        let mut state = self.state.lock().await;

        let latitude =
            LA_LATITUDE + state.rng.random_range(-LOCATION_JITTER_DEG..LOCATION_JITTER_DEG);
        let longitude =
            LA_LONGITUDE + state.rng.random_range(-LOCATION_JITTER_DEG..LOCATION_JITTER_DEG);
        let distance = f64::from(state.rng.random_range(0..MAX_MOCK_DISTANCE_M));
        let created_by = state
            .current_user()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| "current_user".to_string());

        let community = Community {
            id: format!("community_{}", Uuid::new_v4().simple()),
            title: new.title.clone(),
            description: new.description.clone(),
            image: new
                .image
                .clone()
                .unwrap_or_else(|| picsum("300/200", now_ms)),
            tags: new.tags.clone(),
            member_count: 1,
            category: new.category.clone(),
            created_by,
            created_at: timestamp(now_ms),
            location: CommunityLocation {
                latitude,
                longitude,
                address: LA_ADDRESS.to_string(),
            },
            distance: Some(distance),
            is_joined: Some(true),
        };

        state.communities.insert(0, community.clone());
        info!(community_id = %community.id, "mock community created");
        Ok(community)
    }
}

#[async_trait]
impl UserApiPort for MockHobbyApi {
    async fn nearby_users(&self, location: GeoPoint, radius_m: f64) -> Result<Vec<User>, ApiError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|u| {
                u.point()
                    .is_some_and(|p| location.distance_m(&p) <= radius_m)
            })
            .cloned()
            .collect())
    }

    async fn get_profile(&self) -> Result<User, ApiError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        state
            .current_user()
            .or_else(|| state.users.first())
            .cloned()
            .ok_or_else(|| ApiError::Decode("mock user table is empty".to_string()))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let user = state
            .current_user_mut()
            .ok_or_else(|| ApiError::Decode("mock user table is empty".to_string()))?;
        update.apply_to(user);
        Ok(user.clone())
    }

    async fn upload_avatar(&self, image_path: &Path) -> Result<AvatarUpload, ApiError> {
        self.simulate_latency().await;
        debug!(path = %image_path.display(), "mock avatar upload");
        Ok(AvatarUpload {
            avatar_url: picsum("100/100", self.clock.now_ms()),
        })
    }
}

#[async_trait]
impl CommentApiPort for MockHobbyApi {
    async fn list_comments(&self, community_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.simulate_latency().await;
        let now_ms = self.clock.now_ms();
        let mut state = self.state.lock().await;
        Ok(state
            .comments
            .entry(community_id.to_string())
            .or_insert_with(|| mock_data::comments(now_ms))
            .clone())
    }

    async fn create_comment(&self, community_id: &str, text: &str) -> Result<Comment, ApiError> {
        self.simulate_latency().await;
        let now_ms = self.clock.now_ms();
        let mut state = self.state.lock().await;

        let (author_id, author_name, author_avatar) = match state.current_user() {
            Some(user) => (
                user.id.clone(),
                user.name.clone(),
                user.avatar.clone().unwrap_or_else(|| picsum("50/50", 0)),
            ),
            None => ("current_user".to_string(), "You".to_string(), picsum("50/50", 0)),
        };

        let comment = Comment {
            id: format!("comment_{}", Uuid::new_v4().simple()),
            text: text.to_string(),
            author_id,
            author_name,
            author_avatar,
            created_at: timestamp(now_ms),
            likes: 0,
            is_liked: false,
        };

        state
            .comments
            .entry(community_id.to_string())
            .or_insert_with(|| mock_data::comments(now_ms))
            .insert(0, comment.clone());
        Ok(comment)
    }

    async fn like_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        if let Some(comment) = state
            .comments
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|c| c.id == comment_id)
        {
            if !comment.is_liked {
                comment.is_liked = true;
                comment.likes += 1;
            }
        }
        Ok(ActionAck {
            success: true,
            liked: Some(true),
        })
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        for list in state.comments.values_mut() {
            list.retain(|c| c.id != comment_id);
        }
        Ok(ActionAck::ok())
    }
}
