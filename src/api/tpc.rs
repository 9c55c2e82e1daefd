use serde_json::Value;

use crate::client::PortalClient;
use crate::error::Result;

pub async fn list(client: &PortalClient) -> Result<Value> {
    client.get("/tpc/members").await
}

pub async fn create(client: &PortalClient, payload: &Value) -> Result<Value> {
    client.post("/tpc/members", payload).await
}

pub async fn update(client: &PortalClient, id: &str, payload: &Value) -> Result<Value> {
    client.put(&format!("/tpc/members/{id}"), payload).await
}

pub async fn soft_delete(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/tpc/members/{id}")).await
}

pub async fn delete_permanently(client: &PortalClient, id: &str) -> Result<Value> {
    client.delete(&format!("/tpc/members/{id}/permanent")).await
}

/// Server-side filter over committee members; any combination of the three
/// criteria may be supplied.
pub async fn filter(
    client: &PortalClient,
    category: Option<&str>,
    team: Option<&str>,
    session: Option<&str>,
) -> Result<Value> {
    let mut query: Vec<(&str, &str)> = Vec::new();
    if let Some(category) = category {
        query.push(("category", category));
    }
    if let Some(team) = team {
        query.push(("team", team));
    }
    if let Some(session) = session {
        query.push(("session", session));
    }
    client.get_query("/tpc/members/filter", &query).await
}

pub async fn stats(client: &PortalClient) -> Result<Value> {
    client.get("/tpc/members/stats").await
}
