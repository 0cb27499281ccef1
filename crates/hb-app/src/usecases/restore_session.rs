use std::sync::Arc;

use hb_core::ports::HobbyApiPort;
use hb_core::SessionPhase;

use crate::stores::SessionStore;

/// Cold-start rehydration: load the persisted subset, then confirm the
/// stored token against the API.
pub struct RestoreSession {
    api: Arc<dyn HobbyApiPort>,
    session: Arc<SessionStore>,
}

impl RestoreSession {
    pub fn new(api: Arc<dyn HobbyApiPort>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn execute(&self) -> SessionPhase {
        self.session.hydrate().await;
        self.session.check_user(self.api.as_ref()).await;
        self.session.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_store::PersistentStore;
    use crate::test_support::memory_kv;
    use hb_infra::api::{DEMO_EMAIL, DEMO_PASSWORD};
    use hb_infra::{MockHobbyApi, SystemClock};

    #[tokio::test]
    async fn signed_in_session_survives_restart() {
        let kv = memory_kv();
        let first_api = Arc::new(MockHobbyApi::new(kv.clone(), Arc::new(SystemClock), 1));
        let session = Arc::new(SessionStore::new(PersistentStore::new(kv.clone())));
        let auth = crate::usecases::AuthOrchestrator::new(
            first_api,
            session,
            Arc::new(crate::stores::CommunityStore::new()),
        );
        auth.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let api = Arc::new(MockHobbyApi::new(kv.clone(), Arc::new(SystemClock), 1));
        let restored = Arc::new(SessionStore::new(PersistentStore::new(kv)));
        let phase = RestoreSession::new(api, restored.clone()).execute().await;

        assert_eq!(phase, SessionPhase::AuthenticatedNotOnboarded);
        assert_eq!(restored.user().map(|u| u.id), Some("user1".to_string()));
    }

    #[tokio::test]
    async fn fresh_install_is_anonymous() {
        let kv = memory_kv();
        let api = Arc::new(MockHobbyApi::new(kv.clone(), Arc::new(SystemClock), 1));
        let session = Arc::new(SessionStore::new(PersistentStore::new(kv)));

        let phase = RestoreSession::new(api, session).execute().await;

        assert_eq!(phase, SessionPhase::Anonymous);
    }
}
