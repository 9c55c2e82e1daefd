use serde_json::Value;

use crate::client::PortalClient;
use crate::error::Result;

pub async fn list(client: &PortalClient) -> Result<Value> {
    client.get("/faculty").await
}

pub async fn create(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.post("/faculty", payload).await
}

pub async fn update(client: &PortalClient, id: &str, payload: &Value) -> Result<Value> {
    client.put(&format!("/faculty/{id}"), payload).await
}

pub async fn delete(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/faculty/{id}")).await
}

pub async fn stats(client: &PortalClient) -> Result<Value> {
    client.get("/faculty/stats").await
}

/// Server-side search, distinct from the client-side text filter in
/// [`crate::listing`].
pub async fn search(client: &PortalClient, query: &str) -> Result<Value> {
    client.get_query("/faculty/search", &[("q", query)]).await
}
