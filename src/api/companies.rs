use serde_json::Value;

use crate::client::PortalClient;
use crate::error::Result;

pub async fn list(client: &PortalClient) -> Result<Value> {
    client.get("/companies").await
}

pub async fn create(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.post("/companies", payload).await
}

pub async fn update(client: &PortalClient, id: &str, payload: &Value) -> Result<Value> {
    client.put(&format!("/companies/{id}"), payload).await
}

/// Soft delete: the record is flagged and disappears from default listings.
pub async fn soft_delete(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/companies/{id}")).await
}

pub async fn delete_permanently(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/companies/{id}/permanent")).await
}
