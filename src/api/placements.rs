use serde_json::Value;

use crate::client::PortalClient;
use crate::error::Result;

pub async fn list(client: &PortalClient) -> Result<Value> {
    client.get("/placements").await
}

pub async fn create(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.post("/placements", payload).await
}

pub async fn update(client: &PortalClient, id: &str, payload: &Value) -> Result<Value> {
    client.put(&format!("/placements/{id}"), payload).await
}

pub async fn soft_delete(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/placements/{id}")).await
}

pub async fn delete_permanently(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/placements/{id}/permanent")).await
}

/// Look a student up by scholar number when recording a placement.
pub async fn student_by_scholar_number(client: &PortalClient, scholar_number: &str) -> Result<Value> {
    client
        .get(&format!("/placements/student/{scholar_number}"))
        .await
}
