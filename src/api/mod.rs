pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;

/// The one seam between the batch flows and the remote service.
#[async_trait]
pub trait AsanaApi: Send + Sync {
    /// POST `data` to `path` (relative to the API base, e.g. `/tasks`). The
    /// implementation wraps it as `{"data": ...}` and returns the parsed body
    /// of a 2xx response.
    async fn post(&self, path: &str, data: Value) -> Result<Value, ApiError>;
}

/// Identity of a resource the API just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub gid: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    data: Resource,
}

#[derive(Deserialize)]
struct Resource {
    gid: String,
    name: Option<String>,
}

fn parse_created(response: Value) -> Result<Created, ApiError> {
    let envelope: Envelope = serde_json::from_value(response)
        .map_err(|e| ApiError::Decode(format!("missing data.gid ({e})")))?;
    Ok(Created {
        gid: envelope.data.gid,
        name: envelope.data.name,
    })
}

async fn create<P: Serialize + Sync>(
    api: &dyn AsanaApi,
    path: &str,
    payload: &P,
) -> Result<Created, ApiError> {
    let data = serde_json::to_value(payload).map_err(ApiError::Encode)?;
    parse_created(api.post(path, data).await?)
}

pub async fn create_project<P: Serialize + Sync>(
    api: &dyn AsanaApi,
    payload: &P,
) -> Result<Created, ApiError> {
    create(api, "/projects", payload).await
}

pub async fn create_portfolio<P: Serialize + Sync>(
    api: &dyn AsanaApi,
    payload: &P,
) -> Result<Created, ApiError> {
    create(api, "/portfolios", payload).await
}

pub async fn create_task<P: Serialize + Sync>(
    api: &dyn AsanaApi,
    payload: &P,
) -> Result<Created, ApiError> {
    create(api, "/tasks", payload).await
}

pub async fn add_project_to_portfolio(
    api: &dyn AsanaApi,
    portfolio_gid: &str,
    project_gid: &str,
) -> Result<(), ApiError> {
    let path = format!(
        "/portfolios/{}/addItem",
        urlencoding::encode(portfolio_gid)
    );
    api.post(&path, json!({ "item": project_gid })).await?;
    Ok(())
}
