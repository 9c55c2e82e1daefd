use serde_json::{Value, json};

use crate::client::PortalClient;
use crate::error::Result;

pub async fn register(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.post("/students/register", payload).await
}

pub async fn profile(client: &PortalClient) -> Result<Value> {
    client.get("/students/profile").await
}

pub async fn update_profile(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.put("/students/profile", payload).await
}

/// Full roster for the admin dashboard; filtering and pagination happen
/// client-side via [`crate::listing`].
pub async fn list(client: &PortalClient) -> Result<Value> {
    client.get("/admin/students").await
}

pub async fn approve(client: &PortalClient, id: &str) -> Result<Value> {
    client
        .put(&format!("/admin/students/{id}/approve"), &json!({}))
        .await
}

pub async fn reject(client: &PortalClient, id: &str, reason: &str) -> Result<Value> {
    client
        .put(
            &format!("/admin/students/{id}/reject"),
            &json!({ "reason": reason }),
        )
        .await
}

pub async fn update(client: &PortalClient, id: &str, payload: &Value) -> Result<Value> {
    client.put(&format!("/admin/students/{id}"), payload).await
}

pub async fn delete(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/admin/students/{id}")).await
}

pub async fn stats(client: &PortalClient) -> Result<Value> {
    client.get("/admin/students/stats").await
}
