//! # Gist Client
//!
//! `DocumentStore` over a Gist-style snippet API.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create   POST  {base}/gists                                           │
//! │           { "description", "public",                                   │
//! │             "files": { "<file_name>": { "content": "<json>" } } }      │
//! │           ◄── 201 { "id": "...", "files": { ... } }                    │
//! │                                                                         │
//! │  get      GET   {base}/gists/{id}                                      │
//! │           ◄── 200 { "id", "files": { "<file_name>": {                  │
//! │                       "content", "truncated", "raw_url" } } }          │
//! │           truncated? ──► GET raw_url for the full text                 │
//! │                          (credential only to a known host)             │
//! │                                                                         │
//! │  replace  PATCH {base}/gists/{id}                                      │
//! │           { "files": { "<file_name>": { "content": "<json>" } } }      │
//! │                                                                         │
//! │  Headers: Authorization: Bearer <credential>                           │
//! │           Accept: application/vnd.github+json                          │
//! │           User-Agent: gemstock/<version>                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No request timeout and no retry: a slow or failed call is the caller's
//! one attempt.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::document::{DocumentStore, RemoteDocument};
use crate::error::{SyncError, SyncResult};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Public API host and the host it serves raw gist content from.
const GITHUB_API_HOST: &str = "api.github.com";
const GITHUB_RAW_HOST: &str = "gist.githubusercontent.com";

/// Longest error body kept in `RemoteError::message`.
const MAX_ERROR_BODY: usize = 200;

// =============================================================================
// Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    #[serde(default)]
    files: HashMap<String, Option<GistFile>>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Snippet-service client.
#[derive(Debug, Clone)]
pub struct GistClient {
    http: reqwest::Client,
    base_url: Url,
    file_name: String,
    description: String,
    public: bool,
}

impl GistClient {
    /// Builds a client from the `[remote]` configuration.
    pub fn new(config: &RemoteConfig) -> SyncResult<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(SyncError::InvalidUrl(format!(
                "not an http(s) API root: {}",
                config.api_base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(GistClient {
            http,
            base_url,
            file_name: config.file_name.clone(),
            description: config.description.clone(),
            public: config.public,
        })
    }

    /// Name of the content block this client reads and writes.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn endpoint(&self, document_id: Option<&str>) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SyncError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("gists");
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, credential: &str) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(credential)
    }

    fn files_body(&self, content: &str) -> serde_json::Value {
        let mut files = serde_json::Map::new();
        files.insert(
            self.file_name.clone(),
            serde_json::json!({ "content": content }),
        );
        serde_json::Value::Object(files)
    }

    async fn parse_gist(response: Response) -> SyncResult<GistResponse> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SyncError::CorruptRemote(format!("unexpected service response: {}", e)))
    }

    async fn fetch_raw(&self, raw_url: &str, credential: &str) -> SyncResult<String> {
        let url = Url::parse(raw_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::CorruptRemote(format!("raw URL is not http(s): {}", url)));
        }

        let request = if self.trusts(&url) {
            debug!(%url, "Fetching truncated content in full");
            self.request(Method::GET, url, credential)
        } else {
            debug!(%url, "Fetching truncated content from a foreign host without credential");
            self.http.get(url)
        };
        let response = check_status(request.send().await?).await?;
        Ok(response.text().await?)
    }

    /// Whether `url` may receive the credential: same origin as the API
    /// root, or the raw host of the public service.
    fn trusts(&self, url: &Url) -> bool {
        if url.origin() == self.base_url.origin() {
            return true;
        }
        url.scheme() == "https"
            && self.base_url.host_str() == Some(GITHUB_API_HOST)
            && url.host_str() == Some(GITHUB_RAW_HOST)
    }
}

/// Passes success responses through; turns the rest into `RemoteError`.
async fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| message.is_char_boundary(*i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    warn!(status = status.as_u16(), "Document service returned an error");
    Err(SyncError::RemoteError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DocumentStore for GistClient {
    async fn create(&self, credential: &str, content: &str) -> SyncResult<String> {
        let body = serde_json::json!({
            "description": self.description,
            "public": self.public,
            "files": self.files_body(content),
        });

        let response = self
            .request(Method::POST, self.endpoint(None)?, credential)
            .json(&body)
            .send()
            .await?;
        let gist = Self::parse_gist(check_status(response).await?).await?;

        info!(document_id = %gist.id, "Created remote document");
        Ok(gist.id)
    }

    async fn get(&self, credential: &str, document_id: &str) -> SyncResult<RemoteDocument> {
        let response = self
            .request(Method::GET, self.endpoint(Some(document_id))?, credential)
            .send()
            .await?;
        let mut gist = Self::parse_gist(check_status(response).await?).await?;

        let content = match gist.files.remove(&self.file_name).flatten() {
            Some(GistFile {
                truncated: true,
                raw_url: Some(raw_url),
                ..
            }) => Some(self.fetch_raw(&raw_url, credential).await?),
            Some(file) => file.content,
            None => {
                debug!(document_id, file = %self.file_name, "Content block missing");
                None
            }
        };

        Ok(RemoteDocument {
            id: gist.id,
            content,
        })
    }

    async fn replace(&self, credential: &str, document_id: &str, content: &str) -> SyncResult<()> {
        let body = serde_json::json!({ "files": self.files_body(content) });

        let response = self
            .request(Method::PATCH, self.endpoint(Some(document_id))?, credential)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        debug!(document_id, bytes = content.len(), "Replaced remote document");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    const TOKEN: &str = "test-token";
    const FILE: &str = "jewelry-inventory.json";

    #[derive(Default)]
    struct FakeGists {
        base: String,
        docs: Mutex<HashMap<String, String>>,
        raw_base: Mutex<Option<String>>,
        raw_auth: Mutex<Vec<Option<String>>>,
        truncate: Mutex<bool>,
        last_create: Mutex<Option<Value>>,
    }

    type Shared = Arc<FakeGists>;

    fn authorized(headers: &AxumHeaders) -> bool {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
        let accept = headers.get("accept").and_then(|v| v.to_str().ok());
        auth == Some(&format!("Bearer {}", TOKEN)) && accept == Some(GITHUB_MEDIA_TYPE)
    }

    fn gist_json(state: &FakeGists, id: &str, content: &str) -> Value {
        let truncated = *state.truncate.lock().unwrap();
        let shown = if truncated { &content[..content.len().min(3)] } else { content };
        let raw_base = state.raw_base.lock().unwrap().clone().unwrap_or_else(|| state.base.clone());
        json!({
            "id": id,
            "files": { FILE: {
                "content": shown,
                "truncated": truncated,
                "raw_url": format!("{}/raw/{}", raw_base, id),
            }}
        })
    }

    async fn create(
        State(state): State<Shared>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
        }
        let content = body["files"][FILE]["content"].as_str().unwrap_or("").to_string();
        let id = {
            let mut docs = state.docs.lock().unwrap();
            let id = format!("g{}", docs.len() + 1);
            docs.insert(id.clone(), content.clone());
            id
        };
        *state.last_create.lock().unwrap() = Some(body);
        (StatusCode::CREATED, Json(gist_json(&state, &id, &content)))
    }

    async fn fetch(
        State(state): State<Shared>,
        Path(id): Path<String>,
        headers: AxumHeaders,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
        }
        let content = state.docs.lock().unwrap().get(&id).cloned();
        match content {
            Some(content) => (StatusCode::OK, Json(gist_json(&state, &id, &content))),
            None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))),
        }
    }

    async fn patch(
        State(state): State<Shared>,
        Path(id): Path<String>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
        }
        let content = body["files"][FILE]["content"].as_str().unwrap_or("").to_string();
        let updated = match state.docs.lock().unwrap().get_mut(&id) {
            Some(slot) => {
                *slot = content.clone();
                true
            }
            None => false,
        };
        if updated {
            (StatusCode::OK, Json(gist_json(&state, &id, &content)))
        } else {
            (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})))
        }
    }

    async fn raw(
        State(state): State<Shared>,
        Path(id): Path<String>,
        headers: AxumHeaders,
    ) -> (StatusCode, String) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state.raw_auth.lock().unwrap().push(auth);
        match state.docs.lock().unwrap().get(&id) {
            Some(content) => (StatusCode::OK, content.clone()),
            None => (StatusCode::NOT_FOUND, String::new()),
        }
    }

    fn router(state: Shared) -> Router {
        Router::new()
            .route("/gists", post(create))
            .route("/gists/{id}", get(fetch).patch(patch))
            .route("/raw/{id}", get(raw))
            .with_state(state)
    }

    async fn serve(state: Shared) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.ok();
        });
        base
    }

    async fn spawn_fake() -> (Shared, GistClient) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(FakeGists {
            base: base.clone(),
            ..Default::default()
        });

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = GistClient::new(&RemoteConfig {
            api_base_url: base,
            ..RemoteConfig::default()
        })
        .unwrap();
        (state, client)
    }

    #[tokio::test]
    async fn test_create_get_replace() {
        let (state, client) = spawn_fake().await;

        let id = client.create(TOKEN, "[1]").await.unwrap();
        let sent = state.last_create.lock().unwrap().clone().unwrap();
        assert_eq!(sent["public"], false);
        assert_eq!(sent["description"], "Jewelry inventory");

        let doc = client.get(TOKEN, &id).await.unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.content.as_deref(), Some("[1]"));

        client.replace(TOKEN, &id, "[2, 3]").await.unwrap();
        let doc = client.get(TOKEN, &id).await.unwrap();
        assert_eq!(doc.content.as_deref(), Some("[2, 3]"));
    }

    #[tokio::test]
    async fn test_truncated_content_is_fetched_raw() {
        let (state, client) = spawn_fake().await;
        let id = client.create(TOKEN, "[\"a long body\"]").await.unwrap();

        *state.truncate.lock().unwrap() = true;
        let doc = client.get(TOKEN, &id).await.unwrap();
        assert_eq!(doc.content.as_deref(), Some("[\"a long body\"]"));
        assert_eq!(
            state.raw_auth.lock().unwrap().as_slice(),
            [Some(format!("Bearer {}", TOKEN))]
        );
    }

    #[tokio::test]
    async fn test_raw_content_on_foreign_host_gets_no_credential() {
        let (state, client) = spawn_fake().await;
        let id = client.create(TOKEN, "[\"a long body\"]").await.unwrap();

        let foreign = serve(state.clone()).await;
        *state.raw_base.lock().unwrap() = Some(foreign);
        *state.truncate.lock().unwrap() = true;

        let doc = client.get(TOKEN, &id).await.unwrap();
        assert_eq!(doc.content.as_deref(), Some("[\"a long body\"]"));
        assert_eq!(state.raw_auth.lock().unwrap().as_slice(), [None]);
    }

    #[test]
    fn test_trusted_raw_hosts() {
        let public = GistClient::new(&RemoteConfig {
            api_base_url: "https://api.github.com".into(),
            ..RemoteConfig::default()
        })
        .unwrap();
        let raw = Url::parse("https://gist.githubusercontent.com/u/abc/raw/x.json").unwrap();
        assert!(public.trusts(&raw));
        assert!(!public.trusts(&Url::parse("http://gist.githubusercontent.com/u/abc").unwrap()));
        assert!(!public.trusts(&Url::parse("https://evil.example.com/raw").unwrap()));
        assert!(public.trusts(&Url::parse("https://api.github.com/other").unwrap()));

        let private = GistClient::new(&RemoteConfig {
            api_base_url: "https://git.example.com/api/v3".into(),
            ..RemoteConfig::default()
        })
        .unwrap();
        assert!(!private.trusts(&raw));
    }

    #[tokio::test]
    async fn test_missing_document_is_404() {
        let (_state, client) = spawn_fake().await;
        assert!(matches!(
            client.get(TOKEN, "nope").await,
            Err(SyncError::RemoteError { status: 404, .. })
        ));
        assert!(matches!(
            client.replace(TOKEN, "nope", "[]").await,
            Err(SyncError::RemoteError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_credential_is_401() {
        let (_state, client) = spawn_fake().await;
        match client.create("wrong", "[]").await {
            Err(SyncError::RemoteError { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Bad credentials"));
            }
            other => panic!("expected 401, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = GistClient::new(&RemoteConfig {
            api_base_url: base,
            ..RemoteConfig::default()
        })
        .unwrap();
        assert!(matches!(
            client.get(TOKEN, "g1").await,
            Err(SyncError::Transport(_))
        ));
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = GistClient::new(&RemoteConfig {
            api_base_url: "https://git.example.com/api/v3".into(),
            ..RemoteConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint(Some("abc")).unwrap().as_str(),
            "https://git.example.com/api/v3/gists/abc"
        );
        assert_eq!(
            client.endpoint(None).unwrap().as_str(),
            "https://git.example.com/api/v3/gists"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(GistClient::new(&RemoteConfig {
            api_base_url: "mailto:someone@example.com".into(),
            ..RemoteConfig::default()
        })
        .is_err());
    }
}
