//! Sign-in, sign-up and sign-out.
//!
//! API failures propagate unchanged so the caller can show the server's
//! message. Persisting the session afterwards is best effort: a failed
//! flush is logged and the session stays dirty for the next flush.

use std::sync::Arc;

use tracing::{error, info};

use hb_core::ports::{ApiError, HobbyApiPort};
use hb_core::user::TokenRefresh;
use hb_core::{SignUpRequest, User};

use crate::stores::{CommunityStore, SessionStore};

pub struct AuthOrchestrator {
    api: Arc<dyn HobbyApiPort>,
    session: Arc<SessionStore>,
    communities: Arc<CommunityStore>,
    sign_up_sets_interests: bool,
}

impl AuthOrchestrator {
    pub fn new(
        api: Arc<dyn HobbyApiPort>,
        session: Arc<SessionStore>,
        communities: Arc<CommunityStore>,
    ) -> Self {
        Self {
            api,
            session,
            communities,
            sign_up_sets_interests: false,
        }
    }

    /// When set, interests given at sign-up complete onboarding directly.
    pub fn with_sign_up_sets_interests(mut self, enabled: bool) -> Self {
        self.sign_up_sets_interests = enabled;
        self
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let response = self.api.sign_in(email, password).await?;
        let user = response.user;

        self.session.set_user(Some(user.clone()));
        self.apply_server_onboarding(&user);
        self.session.mark_checked();
        self.persist().await;

        info!(user_id = %user.id, onboarded = self.session.state().is_onboarded, "signed in");
        Ok(user)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        let response = self.api.sign_up(request).await?;
        let user = response.user;

        self.session.set_user(Some(user.clone()));
        if self.sign_up_sets_interests && !request.interests.is_empty() {
            self.session.set_interests(request.interests.clone());
            self.session.set_onboarded(true);
        } else {
            self.apply_server_onboarding(&user);
        }
        self.session.mark_checked();
        self.persist().await;

        info!(user_id = %user.id, onboarded = self.session.state().is_onboarded, "signed up");
        Ok(user)
    }

    /// Never fails: the API forgets the token, the session is cleared, and
    /// a failed flush is only logged.
    pub async fn sign_out(&self) {
        self.api.sign_out().await;
        self.session.clear_user();
        self.communities.clear();
        self.persist().await;
        info!("signed out");
    }

    pub async fn refresh_token(&self) -> Result<TokenRefresh, ApiError> {
        self.api.refresh_token().await
    }

    async fn persist(&self) {
        if let Err(e) = self.session.flush().await {
            error!(error = %e, "failed to persist session");
        }
    }

    /// The server flag wins; a missing flag means not onboarded and no
    /// interests carried over from an earlier session.
    fn apply_server_onboarding(&self, user: &User) {
        match user.is_onboarded {
            Some(true) => {
                self.session.set_interests(user.interests.clone());
                self.session.set_onboarded(true);
            }
            _ => {
                self.session.set_interests(Vec::new());
                self.session.set_onboarded(false);
            }
        }
    }
}
