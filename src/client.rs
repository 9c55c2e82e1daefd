use std::sync::Arc;

use reqwest::{Method, StatusCode, header};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::notify::{NotificationKind, Notifier, TracingNotifier};
use crate::session::{MemorySessionStore, SessionCredentials, SessionStore};

/// Endpoints exempt from the refresh-and-retry flow. A 401 from any of these
/// is handed straight back to the calling form, and refreshing in response to
/// a failed refresh would loop forever.
const AUTH_BOOTSTRAP_PATHS: [&str; 3] = ["/auth/login", "/auth/signup", "/auth/refresh"];

const MSG_SESSION_EXPIRED: &str = "Session expired. Please log in again.";
const MSG_ACCESS_DENIED: &str = "Access denied.";
const MSG_SERVER_ERROR: &str = "Server error. Please try again later.";
const MSG_NETWORK_ERROR: &str = "Network error. Check your connection.";
const MSG_UNEXPECTED: &str = "Something went wrong.";
const MSG_REQUEST_FAILED: &str = "Request failed.";

/// Outcome of a single wire attempt, before any recovery or notification.
enum SendFailure {
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    Transport(reqwest::Error),
    Decode(String),
}

struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    // Single-flight latch: concurrent 401 handlers queue here so only the
    // first one actually calls the refresh endpoint.
    refresh_latch: Mutex<()>,
}

/// Authenticated HTTP client for the portal backend.
///
/// Every request carries the stored bearer token when one exists. On a 401
/// from a non-bootstrap endpoint the client refreshes the token once and
/// retries the original request once; every terminal failure surfaces exactly
/// one notification through the injected [`Notifier`].
#[derive(Clone)]
pub struct PortalClient {
    inner: Arc<Inner>,
}

impl PortalClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Unexpected(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                store,
                notifier,
                refresh_latch: Mutex::new(()),
            }),
        })
    }

    /// Client with an in-memory session store and tracing-backed notifier.
    pub fn with_defaults(config: ClientConfig) -> Result<Self> {
        Self::new(
            config,
            Arc::new(MemorySessionStore::new()),
            Arc::new(TracingNotifier),
        )
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, &[], None).await
    }

    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Value> {
        self.request(Method::POST, path, &[], None).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Rotate the stored credential triple via the refresh endpoint, outside
    /// of any failing request. Fails with `SessionExpired` when no session is
    /// stored or the backend rejects the refresh token.
    pub async fn refresh_now(&self) -> Result<SessionCredentials> {
        let stale = self.inner.store.load().map(|c| c.access_token);
        self.refresh_access_token(stale.as_deref()).await?;
        self.inner
            .store
            .load()
            .ok_or_else(|| ApiError::Unexpected("session vanished after refresh".to_string()))
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        // Remember which token the first attempt used so a concurrent refresh
        // by another request can be detected and not repeated.
        let stale = self.inner.store.load().map(|c| c.access_token);

        match self.send_once(&method, path, query, body, None).await {
            Ok(value) => Ok(value),
            Err(SendFailure::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED && !is_bootstrap_path(path) =>
            {
                let fresh = self.refresh_access_token(stale.as_deref()).await?;
                debug!(path, "retrying request with refreshed token");
                self.send_once(&method, path, query, body, Some(&fresh))
                    .await
                    .map_err(|failure| self.classify(path, failure))
            }
            Err(failure) => Err(self.classify(path, failure)),
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        token_override: Option<&str>,
    ) -> std::result::Result<Value, SendFailure> {
        let mut builder = self.inner.http.request(method.clone(), self.url(path));

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let token = match token_override {
            Some(token) => Some(token.to_string()),
            None => self.inner.store.load().map(|c| c.access_token),
        };
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(SendFailure::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(SendFailure::Transport)?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text).map_err(|err| {
                SendFailure::Decode(format!("failed to parse response body: {err}"))
            })
        } else {
            Err(SendFailure::Status {
                status,
                message: extract_message(&text),
            })
        }
    }

    /// Exchange the stored refresh token for a new credential triple.
    ///
    /// `stale` is the access token the caller's failed attempt used; if the
    /// store already holds a different one, another in-flight request has
    /// refreshed in the meantime and the network call is skipped.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String> {
        let _guard = self.inner.refresh_latch.lock().await;

        let current = self.inner.store.load();
        if let Some(credentials) = &current {
            if Some(credentials.access_token.as_str()) != stale {
                debug!("token already rotated by a concurrent refresh");
                return Ok(credentials.access_token.clone());
            }
        }

        let refresh_token = match current.map(|c| c.refresh_token) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(self.invalidate_session()),
        };

        let response = self
            .inner
            .http
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await;

        let rotated = match response {
            Ok(response) if response.status().is_success() => match response.json::<Value>().await
            {
                Ok(body) => SessionCredentials::from_envelope(&body),
                Err(err) => {
                    warn!(?err, "refresh response was not valid JSON");
                    None
                }
            },
            Ok(response) => {
                debug!(status = %response.status(), "refresh endpoint rejected the token");
                None
            }
            Err(err) => {
                warn!(?err, "refresh request failed to complete");
                None
            }
        };

        let Some(credentials) = rotated else {
            return Err(self.invalidate_session());
        };

        let token = credentials.access_token.clone();
        self.inner.store.store(credentials);
        debug!("access token refreshed");
        Ok(token)
    }

    /// Terminal failure: clear the session as a unit and tell the user once.
    fn invalidate_session(&self) -> ApiError {
        self.inner.store.clear();
        self.inner
            .notifier
            .notify(NotificationKind::Error, MSG_SESSION_EXPIRED);
        warn!("session invalidated after failed token refresh");
        ApiError::SessionExpired
    }

    /// Map a wire failure to the public error type, firing the single
    /// user-facing notification for every terminal path except bootstrap
    /// 4xx responses (bar 403), which the calling form handles with its own
    /// messaging.
    fn classify(&self, path: &str, failure: SendFailure) -> ApiError {
        match failure {
            SendFailure::Status { status, message }
                if is_bootstrap_path(path)
                    && status.is_client_error()
                    && status != StatusCode::FORBIDDEN =>
            {
                ApiError::Request {
                    status: status.as_u16(),
                    message: message.unwrap_or_else(|| MSG_REQUEST_FAILED.to_string()),
                }
            }
            SendFailure::Status { status, .. } if status == StatusCode::FORBIDDEN => {
                self.notify_error(MSG_ACCESS_DENIED);
                ApiError::AccessDenied
            }
            SendFailure::Status { status, message } if status.is_server_error() => {
                self.notify_error(MSG_SERVER_ERROR);
                ApiError::Server {
                    status: status.as_u16(),
                    message: message.unwrap_or_else(|| MSG_SERVER_ERROR.to_string()),
                }
            }
            SendFailure::Status { status, message } => {
                let message = message.unwrap_or_else(|| MSG_REQUEST_FAILED.to_string());
                self.notify_error(&message);
                ApiError::Request {
                    status: status.as_u16(),
                    message,
                }
            }
            SendFailure::Transport(err) if err.is_builder() => {
                self.notify_error(MSG_UNEXPECTED);
                ApiError::Unexpected(err.to_string())
            }
            SendFailure::Transport(err) => {
                self.notify_error(MSG_NETWORK_ERROR);
                ApiError::Network(err)
            }
            SendFailure::Decode(message) => {
                self.notify_error(MSG_UNEXPECTED);
                ApiError::Unexpected(message)
            }
        }
    }

    fn notify_error(&self, message: &str) {
        self.inner.notifier.notify(NotificationKind::Error, message);
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn is_bootstrap_path(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    AUTH_BOOTSTRAP_PATHS
        .iter()
        .any(|candidate| candidate.trim_start_matches('/') == path)
}

/// Pull the backend's own `message` (or `error`) field out of a failure body.
fn extract_message(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
