//! People around the device.

use std::sync::Arc;

use tracing::{debug, warn};

use hb_core::ports::{ApiError, HobbyApiPort};
use hb_core::{GeoPoint, User};

use crate::preferences::PreferencesService;
use crate::stores::{MapStore, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum NearbyError {
    #[error("no location known, pass one explicitly")]
    NoLocation,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct LoadNearbyUsers {
    api: Arc<dyn HobbyApiPort>,
    session: Arc<SessionStore>,
    map: Arc<MapStore>,
    preferences: PreferencesService,
}

impl LoadNearbyUsers {
    pub fn new(
        api: Arc<dyn HobbyApiPort>,
        session: Arc<SessionStore>,
        map: Arc<MapStore>,
        preferences: PreferencesService,
    ) -> Self {
        Self {
            api,
            session,
            map,
            preferences,
        }
    }

    /// Search around `location`, which is cached for later calls. Without
    /// one, the cached device location is used, then the signed-in user's
    /// profile location.
    pub async fn execute(
        &self,
        location: Option<GeoPoint>,
        radius_m: f64,
    ) -> Result<Vec<User>, NearbyError> {
        let origin = match location {
            Some(point) => {
                if let Err(e) = self.preferences.cache_location(point).await {
                    warn!(error = %e, "failed to cache location");
                }
                point
            }
            None => self.fallback_origin().await.ok_or(NearbyError::NoLocation)?,
        };
        self.map.set_user_location(Some(origin));

        let users = self.api.nearby_users(origin, radius_m).await?;
        debug!(count = users.len(), radius_m, "nearby users loaded");
        self.map.set_nearby_users(users.clone());
        Ok(users)
    }

    async fn fallback_origin(&self) -> Option<GeoPoint> {
        match self.preferences.cached_location().await {
            Ok(Some(point)) => return Some(point),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read cached location"),
        }
        self.session.user().and_then(|u| u.point())
    }
}
