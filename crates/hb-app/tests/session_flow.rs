//! End-to-end flows over the mock API and the file-backed store.

use std::sync::Arc;

use hb_app::{App, AppDeps, AppOptions};
use hb_core::ports::{ClockPort, HobbyApiPort, KeyValueStorePort};
use hb_core::storage_keys::AUTH_TOKEN;
use hb_core::{CommunityFilter, SessionPhase};
use hb_infra::api::{DEMO_EMAIL, DEMO_PASSWORD};
use hb_infra::{FileKeyValueStore, MockHobbyApi, SystemClock};
use tempfile::TempDir;

fn app_at(dir: &TempDir) -> (App, Arc<dyn KeyValueStorePort>) {
    let kv: Arc<dyn KeyValueStorePort> = Arc::new(FileKeyValueStore::with_defaults(dir.path()));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let api: Arc<dyn HobbyApiPort> = Arc::new(MockHobbyApi::new(kv.clone(), clock.clone(), 42));
    let app = App::new(
        AppDeps {
            kv: kv.clone(),
            api,
            clock,
        },
        AppOptions::default(),
    );
    (app, kv)
}

#[tokio::test]
async fn sign_in_onboard_and_restart() {
    let dir = TempDir::new().unwrap();

    {
        let (app, _kv) = app_at(&dir);
        assert_eq!(app.start().await, SessionPhase::Anonymous);

        app.auth().sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert_eq!(
            app.session().state().confirmed_interests(),
            None,
            "interests are not meaningful before onboarding"
        );

        app.session().toggle_interest("Hiking");
        app.session().toggle_interest("Photo");
        app.onboarding().execute().await.unwrap();
        assert_eq!(
            app.session().state().confirmed_interests(),
            Some(&["Hiking".to_string(), "Photo".to_string()][..])
        );
        app.shutdown().await;
    }

    // A new process sees the persisted subset and the stored token
    let (app, kv) = app_at(&dir);
    assert!(kv.get(AUTH_TOKEN).await.unwrap().is_some());
    app.start().await;
    let state = app.session().state();
    assert_eq!(state.user.map(|u| u.id), Some("user1".to_string()));
    assert_eq!(state.interests, vec!["Hiking".to_string(), "Photo".to_string()]);
}

#[tokio::test]
async fn join_leave_and_sign_out() {
    let dir = TempDir::new().unwrap();
    let (app, kv) = app_at(&dir);
    app.start().await;
    app.auth().sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let list = app
        .load_communities()
        .execute(&CommunityFilter::default(), None)
        .await
        .unwrap();
    assert_eq!(list.len(), 3);

    let joined = app.membership().join("2").await.unwrap();
    assert_eq!(joined.member_count, Some(157));
    assert!(app.communities().is_joined("2"));

    app.membership().leave("2").await.unwrap();
    assert!(!app.communities().is_joined("2"));

    app.auth().sign_out().await;
    assert_eq!(kv.get(AUTH_TOKEN).await.unwrap(), None);
    assert_eq!(app.start().await, SessionPhase::Anonymous);
}
