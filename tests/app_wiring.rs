//! Wiring from configuration through to a running app.

use hb_core::config::AppConfig;
use hb_core::storage_keys::AUTH_TOKEN;
use hb_core::SessionPhase;
use hobbyapp::{build_app, ApiMode, StorageBackend};
use mockito::Server;
use tempfile::TempDir;

const ONBOARDED_USER: &str = r#"{"id":"u1","name":"Ana","email":"ana@example.com","interests":["Art"],"isOnboarded":true}"#;

fn http_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::empty();
    config.api_mode = "http".to_string();
    config.api_base_url = base_url.to_string();
    config
}

#[tokio::test]
async fn http_session_survives_restart() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/signin")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"token":"tok-1","user":{ONBOARDED_USER}}}"#))
        .create_async()
        .await;
    let me = server
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ONBOARDED_USER)
        .create_async()
        .await;
    let dir = TempDir::new().unwrap();
    let config = http_config(&server.url());

    {
        let wired = build_app(&config, dir.path()).unwrap();
        assert_eq!(wired.api_mode, ApiMode::Http);
        assert_eq!(wired.storage_backend, StorageBackend::File);
        assert_eq!(wired.app.start().await, SessionPhase::Anonymous);

        wired.app.auth().sign_in("ana@example.com", "pw").await.unwrap();
        assert_eq!(wired.app.session().phase(), SessionPhase::AuthenticatedOnboarded);
        wired.app.shutdown().await;
    }

    let wired = build_app(&config, dir.path()).unwrap();
    assert_eq!(wired.app.start().await, SessionPhase::AuthenticatedOnboarded);
    assert_eq!(
        wired.app.session().state().confirmed_interests(),
        Some(&["Art".to_string()][..])
    );
    me.assert_async().await;
}

#[tokio::test]
async fn rejected_token_signs_out_on_start() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/signin")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"token":"stale","user":{ONBOARDED_USER}}}"#))
        .create_async()
        .await;
    server
        .mock("GET", "/users/me")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"token expired"}"#)
        .create_async()
        .await;
    let dir = TempDir::new().unwrap();
    let config = http_config(&server.url());

    {
        let wired = build_app(&config, dir.path()).unwrap();
        wired.app.start().await;
        wired.app.auth().sign_in("ana@example.com", "pw").await.unwrap();
        wired.app.shutdown().await;
    }

    let wired = build_app(&config, dir.path()).unwrap();
    assert_eq!(wired.app.start().await, SessionPhase::Anonymous);
    assert!(wired.app.session().user().is_none());

    assert!(wired
        .app
        .preferences()
        .storage_keys()
        .await
        .unwrap()
        .iter()
        .all(|key| key != AUTH_TOKEN));
}

#[tokio::test]
async fn memory_backend_forgets_between_builds() {
    let mut config = AppConfig::empty();
    config.storage_backend = "memory".to_string();
    let dir = TempDir::new().unwrap();

    {
        let wired = build_app(&config, dir.path()).unwrap();
        assert_eq!(wired.api_mode, ApiMode::Mock);
        wired.app.start().await;
        wired
            .app
            .auth()
            .sign_in(hb_infra::api::DEMO_EMAIL, hb_infra::api::DEMO_PASSWORD)
            .await
            .unwrap();
        wired.app.preferences().add_search_query("chess").await.unwrap();
        wired.app.shutdown().await;
    }

    let wired = build_app(&config, dir.path()).unwrap();
    assert_eq!(wired.app.start().await, SessionPhase::Anonymous);
    assert!(wired.app.preferences().search_history().await.unwrap().is_empty());
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
#[serial_test::serial]
fn env_base_url_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut file,
        b"[api]\nmode = \"http\"\nbase_url = \"https://from-file.example.com\"\n",
    )
    .unwrap();

    std::env::set_var(
        hobbyapp::bootstrap::config::API_BASE_URL_ENV,
        "http://localhost:3000",
    );
    let config = hobbyapp::bootstrap::config::load_effective_config(Some(file.path()));
    std::env::remove_var(hobbyapp::bootstrap::config::API_BASE_URL_ENV);

    let config = config.unwrap();
    assert_eq!(config.api_mode, "http");
    assert_eq!(config.api_base_url, "http://localhost:3000");
}

#[test]
#[serial_test::serial]
fn no_config_file_means_mock_defaults() {
    std::env::remove_var(hobbyapp::bootstrap::config::API_BASE_URL_ENV);

    let config = hobbyapp::bootstrap::config::load_effective_config(None).unwrap();

    assert_eq!(ApiMode::parse(&config.api_mode), ApiMode::Mock);
    assert_eq!(StorageBackend::parse(&config.storage_backend), StorageBackend::File);
}
