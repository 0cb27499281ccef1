use std::sync::Arc;

use tracing::info;

use hb_core::ports::{ApiError, HobbyApiPort};
use hb_core::{Community, NewCommunity};

use crate::stores::CommunityStore;

/// Create a community; the creator is a member of it.
pub struct CreateCommunity {
    api: Arc<dyn HobbyApiPort>,
    communities: Arc<CommunityStore>,
}

impl CreateCommunity {
    pub fn new(api: Arc<dyn HobbyApiPort>, communities: Arc<CommunityStore>) -> Self {
        Self { api, communities }
    }

    pub async fn execute(&self, new: &NewCommunity) -> Result<Community, ApiError> {
        let created = self.api.create_community(new).await?;
        info!(community_id = %created.id, "community created");
        self.communities.add_community(created.clone(), true);
        Ok(self.communities.get(&created.id).unwrap_or(created))
    }
}
