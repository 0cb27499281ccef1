use std::sync::Arc;

use tracing::debug;

use hb_core::ports::{ApiError, HobbyApiPort};
use hb_core::{Community, CommunityFilter, GeoPoint};

use crate::stores::CommunityStore;

/// Fetch the community list and hand it to the store.
pub struct LoadCommunities {
    api: Arc<dyn HobbyApiPort>,
    communities: Arc<CommunityStore>,
}

impl LoadCommunities {
    pub fn new(api: Arc<dyn HobbyApiPort>, communities: Arc<CommunityStore>) -> Self {
        Self { api, communities }
    }

    /// With an `origin`, each entry's distance is recomputed from it.
    /// Returns the list as stored, with membership projected.
    pub async fn execute(
        &self,
        filter: &CommunityFilter,
        origin: Option<GeoPoint>,
    ) -> Result<Vec<Community>, ApiError> {
        let mut list = self.api.list_communities(filter).await?;
        if let Some(origin) = origin {
            for community in &mut list {
                community.distance = Some(origin.distance_m(&community.point()));
            }
        }
        debug!(count = list.len(), "communities loaded");
        self.communities.set_communities(list);
        Ok(self.communities.communities())
    }
}
