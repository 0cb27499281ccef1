//! The application runtime: stores plus the use cases that drive them.

use std::sync::Arc;

use tracing::{error, info};

use hb_core::ports::HobbyApiPort;
use hb_core::SessionPhase;

use crate::deps::AppDeps;
use crate::kv_store::PersistentStore;
use crate::preferences::PreferencesService;
use crate::stores::{CommunityStore, MapStore, SessionStore};
use crate::usecases::{
    AuthOrchestrator, CommunityMembership, CompleteOnboarding, CreateCommunity, LoadCommunities,
    LoadNearbyUsers, RestoreSession,
};

/// Options that change behaviour but not wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    pub sign_up_sets_interests: bool,
}

pub struct App {
    api: Arc<dyn HobbyApiPort>,
    session: Arc<SessionStore>,
    communities: Arc<CommunityStore>,
    map: Arc<MapStore>,
    preferences: PreferencesService,
    auth: AuthOrchestrator,
    restore: RestoreSession,
    onboarding: CompleteOnboarding,
    load_communities: LoadCommunities,
    membership: CommunityMembership,
    create_community: CreateCommunity,
    nearby: LoadNearbyUsers,
}

impl App {
    /// The constructor signature is the dependency manifest.
    pub fn new(deps: AppDeps, options: AppOptions) -> Self {
        let storage = PersistentStore::new(deps.kv);
        let session = Arc::new(SessionStore::new(storage.clone()));
        let communities = Arc::new(CommunityStore::new());
        let map = Arc::new(MapStore::new());
        let preferences = PreferencesService::new(storage, deps.clock);
        let api = deps.api;

        Self {
            auth: AuthOrchestrator::new(api.clone(), session.clone(), communities.clone())
                .with_sign_up_sets_interests(options.sign_up_sets_interests),
            restore: RestoreSession::new(api.clone(), session.clone()),
            onboarding: CompleteOnboarding::new(api.clone(), session.clone()),
            load_communities: LoadCommunities::new(api.clone(), communities.clone()),
            membership: CommunityMembership::new(api.clone(), communities.clone()),
            create_community: CreateCommunity::new(api.clone(), communities.clone()),
            nearby: LoadNearbyUsers::new(api.clone(), session.clone(), map.clone(), preferences.clone()),
            preferences,
            api,
            session,
            communities,
            map,
        }
    }

    /// Rehydrate the session. Call once before anything reads it.
    pub async fn start(&self) -> SessionPhase {
        let phase = self.restore.execute().await;
        info!(?phase, "app started");
        phase
    }

    /// Flush pending session changes before the process exits.
    pub async fn shutdown(&self) {
        if let Err(e) = self.session.flush().await {
            error!(error = %e, "failed to flush session on shutdown");
        }
    }

    /// Direct access to the API boundary for reads that touch no store.
    pub fn api(&self) -> &Arc<dyn HobbyApiPort> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn communities(&self) -> &Arc<CommunityStore> {
        &self.communities
    }

    pub fn map(&self) -> &Arc<MapStore> {
        &self.map
    }

    pub fn preferences(&self) -> &PreferencesService {
        &self.preferences
    }

    pub fn auth(&self) -> &AuthOrchestrator {
        &self.auth
    }

    pub fn onboarding(&self) -> &CompleteOnboarding {
        &self.onboarding
    }

    pub fn load_communities(&self) -> &LoadCommunities {
        &self.load_communities
    }

    pub fn membership(&self) -> &CommunityMembership {
        &self.membership
    }

    pub fn create_community(&self) -> &CreateCommunity {
        &self.create_community
    }

    pub fn nearby(&self) -> &LoadNearbyUsers {
        &self.nearby
    }
}
