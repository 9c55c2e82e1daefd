use serde_json::{Value, json};
use tracing::debug;

use crate::client::PortalClient;
use crate::error::{ApiError, Result};
use crate::session::SessionCredentials;

/// Log in and persist the returned credential triple.
pub async fn login(client: &PortalClient, email: &str, password: &str) -> Result<SessionCredentials> {
    let body = json!({ "email": email, "password": password });
    let response = client.post("/auth/login", &body).await?;
    store_credentials(client, &response, "login")
}

/// Create an account; a successful signup also opens a session.
pub async fn signup(client: &PortalClient, payload: &Value) -> Result<SessionCredentials> {
    let response = client.post("/auth/signup", payload).await?;
    store_credentials(client, &response, "signup")
}

/// End the session. The server call is best-effort; local credentials are
/// cleared regardless so the user is logged out even when offline.
pub async fn logout(client: &PortalClient) {
    if let Err(err) = client.post_empty("/auth/logout").await {
        debug!(?err, "logout request failed, clearing session anyway");
    }
    client.session().clear();
}

/// Explicitly rotate the stored tokens.
pub async fn refresh(client: &PortalClient) -> Result<SessionCredentials> {
    client.refresh_now().await
}

fn store_credentials(
    client: &PortalClient,
    response: &Value,
    operation: &str,
) -> Result<SessionCredentials> {
    let credentials = SessionCredentials::from_envelope(response)
        .ok_or_else(|| ApiError::Unexpected(format!("malformed {operation} response")))?;
    client.session().store(credentials.clone());
    Ok(credentials)
}
