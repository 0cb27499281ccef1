//! Completing hobby selection.
//!
//! The server is told first; the local session only moves to onboarded
//! once the profile update succeeded.

use std::sync::Arc;

use tracing::info;

use hb_core::ports::{ApiError, HobbyApiPort, StorageError};
use hb_core::ProfileUpdate;

use crate::stores::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("no user is signed in")]
    NotSignedIn,
    #[error("select at least one interest")]
    NoInterests,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct CompleteOnboarding {
    api: Arc<dyn HobbyApiPort>,
    session: Arc<SessionStore>,
}

impl CompleteOnboarding {
    pub fn new(api: Arc<dyn HobbyApiPort>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Confirm the interests currently selected in the session.
    pub async fn execute(&self) -> Result<(), OnboardingError> {
        let interests = self.session.state().interests;
        self.execute_with(interests).await
    }

    pub async fn execute_with(&self, interests: Vec<String>) -> Result<(), OnboardingError> {
        let mut user = self.session.user().ok_or(OnboardingError::NotSignedIn)?;
        if interests.is_empty() {
            return Err(OnboardingError::NoInterests);
        }

        let update = ProfileUpdate {
            interests: Some(interests.clone()),
            is_onboarded: Some(true),
            ..Default::default()
        };
        self.api.update_profile(&update).await?;

        // The response may be partial, so patch the local record instead
        update.apply_to(&mut user);
        self.session.set_user(Some(user));
        self.session.set_interests(interests);
        self.session.set_onboarded(true);
        self.session.flush().await?;

        info!(interests = self.session.state().interests.len(), "onboarding completed");
        Ok(())
    }
}
