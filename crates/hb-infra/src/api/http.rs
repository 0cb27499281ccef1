//! Live API boundary over HTTP.
//!
//! Every request carries `Authorization: Bearer <token>` once a token is
//! known. Non-2xx responses become [`ApiError::Status`] with the server's
//! `message` field when the body has one. Successful bodies are parsed as
//! JSON when the response says so and otherwise kept as plain text.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use hb_core::ports::{
    ApiError, AuthApiPort, CommentApiPort, CommunityApiPort, KeyValueStorePort, UserApiPort,
};
use hb_core::user::{AvatarUpload, TokenRefresh};
use hb_core::{
    ActionAck, AuthResponse, Comment, Community, CommunityFilter, GeoPoint, NewCommunity,
    ProfileUpdate, SignUpRequest, User,
};

use super::token::BearerToken;

const AVATAR_FIELD: &str = "avatar";
const AVATAR_MIME: &str = "image/jpeg";
const AVATAR_DEFAULT_NAME: &str = "avatar.jpg";

pub struct HttpHobbyApi {
    client: Client,
    base_url: Url,
    token: BearerToken,
}

impl HttpHobbyApi {
    pub fn new(base_url: &str, kv: Arc<dyn KeyValueStorePort>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base url `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "base url `{base_url}` cannot carry a path"
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("http client init failed: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: BearerToken::new(kv),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::Transport(format!("base url `{}` cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.token.current().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().clone();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "api response");

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        if is_json && !body.trim().is_empty() {
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Ok(Value::String(body))
        }
    }

    async fn send_as<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 2xx is the success signal; the body only refines it.
    async fn send_ack(&self, request: RequestBuilder) -> Result<ActionAck, ApiError> {
        match self.send(request).await? {
            Value::Object(map) => Ok(ActionAck {
                success: map.get("success").and_then(Value::as_bool).unwrap_or(true),
                liked: map.get("liked").and_then(Value::as_bool),
            }),
            _ => Ok(ActionAck::ok()),
        }
    }

    async fn send_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        match self.send_as(request).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn authenticate(&self, request: RequestBuilder) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.send_as(request).await?;
        self.token.store(response.token.as_deref()).await?;
        info!(
            user_id = %response.user.id,
            token = response.token.is_some(),
            "authenticated"
        );
        Ok(response)
    }
}

#[async_trait]
impl AuthApiPort for HttpHobbyApi {
    async fn init(&self) -> Result<(), ApiError> {
        self.token.load().await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, &["auth", "signin"])?
            .json(&json!({ "email": email, "password": password }));
        self.authenticate(request).await
    }

    async fn sign_up(&self, form: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, &["auth", "signup"])?
            .json(form);
        self.authenticate(request).await
    }

    async fn sign_out(&self) {
        if let Err(e) = self.token.clear().await {
            warn!(error = %e, "failed to clear stored token on sign-out");
        }
        info!("signed out");
    }

    async fn refresh_token(&self) -> Result<TokenRefresh, ApiError> {
        let request = self.request(Method::POST, &["auth", "refresh"])?;
        let refreshed: TokenRefresh = self.send_as(request).await?;
        self.token.store(Some(&refreshed.token)).await?;
        Ok(refreshed)
    }
}

#[async_trait]
impl CommunityApiPort for HttpHobbyApi {
    async fn list_communities(
        &self,
        filter: &CommunityFilter,
    ) -> Result<Vec<Community>, ApiError> {
        let request = self.request(Method::GET, &["communities"])?.query(filter);
        self.send_as(request).await
    }

    async fn get_community(&self, id: &str) -> Result<Option<Community>, ApiError> {
        let request = self.request(Method::GET, &["communities", id])?;
        self.send_optional(request).await
    }

    async fn join_community(&self, id: &str) -> Result<ActionAck, ApiError> {
        let request = self.request(Method::POST, &["communities", id, "join"])?;
        self.send_ack(request).await
    }

    async fn leave_community(&self, id: &str) -> Result<ActionAck, ApiError> {
        let request = self.request(Method::POST, &["communities", id, "leave"])?;
        self.send_ack(request).await
    }

    async fn create_community(&self, community: &NewCommunity) -> Result<Community, ApiError> {
        let request = self
            .request(Method::POST, &["communities"])?
            .json(community);
        self.send_as(request).await
    }
}

#[async_trait]
impl UserApiPort for HttpHobbyApi {
    async fn nearby_users(&self, location: GeoPoint, radius_m: f64) -> Result<Vec<User>, ApiError> {
        let request = self
            .request(Method::POST, &["users", "nearby"])?
            .json(&json!({
                "latitude": location.latitude,
                "longitude": location.longitude,
                "radius": radius_m,
            }));
        self.send_as(request).await
    }

    async fn get_profile(&self) -> Result<User, ApiError> {
        let request = self.request(Method::GET, &["users", "me"])?;
        self.send_as(request).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError> {
        let request = self.request(Method::GET, &["users", id])?;
        self.send_optional(request).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let request = self.request(Method::PATCH, &["users", "me"])?.json(update);
        self.send_as(request).await
    }

    async fn upload_avatar(&self, image_path: &Path) -> Result<AvatarUpload, ApiError> {
        let bytes = tokio::fs::read(image_path).await.map_err(|e| {
            ApiError::Transport(format!("read `{}` failed: {e}", image_path.display()))
        })?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(AVATAR_DEFAULT_NAME)
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(AVATAR_MIME)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = Form::new().part(AVATAR_FIELD, part);

        let request = self
            .request(Method::POST, &["users", "avatar"])?
            .multipart(form);
        self.send_as(request).await
    }
}

#[async_trait]
impl CommentApiPort for HttpHobbyApi {
    async fn list_comments(&self, community_id: &str) -> Result<Vec<Comment>, ApiError> {
        let request = self.request(Method::GET, &["communities", community_id, "comments"])?;
        self.send_as(request).await
    }

    async fn create_comment(&self, community_id: &str, text: &str) -> Result<Comment, ApiError> {
        let request = self
            .request(Method::POST, &["communities", community_id, "comments"])?
            .json(&json!({ "text": text }));
        self.send_as(request).await
    }

    async fn like_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError> {
        let request = self.request(Method::POST, &["comments", comment_id, "like"])?;
        self.send_ack(request).await
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<ActionAck, ApiError> {
        let request = self.request(Method::DELETE, &["comments", comment_id])?;
        self.send_ack(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryKeyValueStore;
    use hb_core::storage_keys::AUTH_TOKEN;
    use mockito::{Matcher, Server};

    const USER_JSON: &str = r#"{"id":"u1","name":"Ana","email":"ana@example.com"}"#;

    fn api(server: &Server) -> (HttpHobbyApi, Arc<dyn KeyValueStorePort>) {
        let kv: Arc<dyn KeyValueStorePort> = Arc::new(InMemoryKeyValueStore::new());
        let api = HttpHobbyApi::new(&server.url(), kv.clone()).unwrap();
        (api, kv)
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let kv: Arc<dyn KeyValueStorePort> = Arc::new(InMemoryKeyValueStore::new());
        let api = HttpHobbyApi::new("https://api.example.com/v1/", kv).unwrap();

        let url = api.endpoint(&["communities", "a b", "join"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/communities/a%20b/join"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let kv: Arc<dyn KeyValueStorePort> = Arc::new(InMemoryKeyValueStore::new());
        assert!(HttpHobbyApi::new("not a url", kv.clone()).is_err());
        assert!(HttpHobbyApi::new("mailto:someone@example.com", kv).is_err());
    }

    #[tokio::test]
    async fn sign_in_persists_token_and_sends_it_afterwards() {
        let mut server = Server::new_async().await;
        let signin = server
            .mock("POST", "/auth/signin")
            .match_body(Matcher::Json(
                json!({"email": "ana@example.com", "password": "pw"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"token":"tok-1","user":{USER_JSON}}}"#))
            .create_async()
            .await;
        let me = server
            .mock("GET", "/users/me")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(USER_JSON)
            .create_async()
            .await;
        let (api, kv) = api(&server);

        let response = api.sign_in("ana@example.com", "pw").await.unwrap();
        let profile = api.get_profile().await.unwrap();

        signin.assert_async().await;
        me.assert_async().await;
        assert_eq!(response.token.as_deref(), Some("tok-1"));
        assert_eq!(profile.name, "Ana");
        assert_eq!(kv.get(AUTH_TOKEN).await.unwrap().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn sign_in_without_token_clears_stored_one() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/signin")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"user":{USER_JSON}}}"#))
            .create_async()
            .await;
        let (api, kv) = api(&server);
        kv.set(AUTH_TOKEN, "stale").await.unwrap();

        api.sign_in("ana@example.com", "pw").await.unwrap();

        assert_eq!(kv.get(AUTH_TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn error_status_carries_server_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/signin")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Wrong password"}"#)
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        let err = api.sign_in("ana@example.com", "bad").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Wrong password");
    }

    #[tokio::test]
    async fn error_status_without_message_uses_generic_text() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/communities")
            .with_status(503)
            .with_body("upstream down")
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        let err = api
            .list_communities(&CommunityFilter::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API Error: 503");
    }

    #[tokio::test]
    async fn list_sends_filter_as_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/communities")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("category".into(), "Sport".into()),
                Matcher::UrlEncoded("search".into(), "hik".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"2","title":"Weekend Hikers","memberCount":156}]"#)
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        let communities = api
            .list_communities(&CommunityFilter {
                category: Some("Sport".to_string()),
                search: Some("hik".to_string()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(communities.len(), 1);
        assert_eq!(communities[0].member_count, 156);
    }

    #[tokio::test]
    async fn missing_community_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/communities/nope")
            .with_status(404)
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        assert_eq!(api.get_community("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn ack_endpoints_accept_empty_and_text_bodies() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/communities/1/join")
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("POST", "/communities/1/leave")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("ok")
            .create_async()
            .await;
        server
            .mock("POST", "/comments/c1/like")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"liked":true}"#)
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        assert_eq!(api.join_community("1").await.unwrap(), ActionAck::ok());
        assert_eq!(api.leave_community("1").await.unwrap(), ActionAck::ok());
        assert_eq!(api.like_comment("c1").await.unwrap().liked, Some(true));
    }

    #[tokio::test]
    async fn update_profile_sends_only_present_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/users/me")
            .match_body(Matcher::Json(
                json!({"interests": ["Hiking"], "isOnboarded": true}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"u1","name":"Ana","email":"ana@example.com","isOnboarded":true}"#)
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        let user = api
            .update_profile(&ProfileUpdate {
                interests: Some(vec!["Hiking".to_string()]),
                is_onboarded: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(user.is_onboarded, Some(true));
    }

    #[tokio::test]
    async fn nearby_posts_location_and_radius() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/users/nearby")
            .match_body(Matcher::Json(
                json!({"latitude": 34.0, "longitude": -118.0, "radius": 5000.0}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let (api, _kv) = api(&server);

        let users = api
            .nearby_users(GeoPoint::new(34.0, -118.0), 5_000.0)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn upload_avatar_posts_multipart() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/users/avatar")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="avatar""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"avatarUrl":"https://cdn.example.com/a.jpg"}"#)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("me.jpg");
        std::fs::write(&image, b"jpeg-bytes").unwrap();
        let (api, _kv) = api(&server);

        let upload = api.upload_avatar(&image).await.unwrap();

        mock.assert_async().await;
        assert_eq!(upload.avatar_url, "https://cdn.example.com/a.jpg");
    }

    #[tokio::test]
    async fn sign_out_clears_token_without_network() {
        let server = Server::new_async().await;
        let (api, kv) = api(&server);
        kv.set(AUTH_TOKEN, "tok").await.unwrap();
        api.init().await.unwrap();

        api.sign_out().await;

        assert_eq!(kv.get(AUTH_TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let kv: Arc<dyn KeyValueStorePort> = Arc::new(InMemoryKeyValueStore::new());
        // Nothing listens on port 9 of localhost in the test environment
        let api = HttpHobbyApi::new("http://127.0.0.1:9", kv).unwrap();

        let err = api.get_profile().await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }
}
