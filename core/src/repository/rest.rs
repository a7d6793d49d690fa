use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, Url};
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::RemoteError;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::repository::traits::{OrderBy, TaskRepository};

const REST_PATH: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body returned by PostgREST on a rejected request.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Table client for a PostgREST endpoint (e.g. a Supabase project).
#[derive(Clone)]
pub struct RestTaskRepository {
    client: reqwest::Client,
    table_url: Url,
}

impl RestTaskRepository {
    pub fn new(config: BackendConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| RemoteError::Transport(format!("Invalid API key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| RemoteError::Transport(format!("Invalid API key header: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        let table_url = table_url(&config)?;
        Ok(Self { client, table_url })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => RemoteError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                }),
                details: parsed.details,
                hint: parsed.hint,
            },
            Err(_) => RemoteError::Api {
                status: status.as_u16(),
                code: None,
                message: if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    body
                },
                details: None,
                hint: None,
            },
        };
        Err(error)
    }

    async fn read_rows(response: Response) -> Result<Vec<Task>, RemoteError> {
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: Option<Vec<Task>> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(rows.unwrap_or_default())
    }
}

/// `<url>/rest/v1/<table>`, with the table name percent-encoded as one
/// path segment.
fn table_url(config: &BackendConfig) -> Result<Url, RemoteError> {
    let mut url = Url::parse(&config.url).map_err(|e| {
        RemoteError::Transport(format!("Invalid backend URL '{}': {}", config.url, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            RemoteError::Transport(format!("Backend URL '{}' cannot take a path", config.url))
        })?
        .pop_if_empty()
        .extend(REST_PATH.split('/'))
        .push(&config.table);
    Ok(url)
}

fn order_param(order: &OrderBy) -> String {
    let direction = if order.ascending { "asc" } else { "desc" };
    format!("{}.{}", order.column, direction)
}

fn id_filter(id: TaskId) -> String {
    format!("eq.{}", id)
}

#[async_trait]
impl TaskRepository for RestTaskRepository {
    async fn list_all(&self, order: &OrderBy) -> Result<Vec<Task>, RemoteError> {
        let request = self
            .client
            .get(self.table_url.clone())
            .query(&[("select", "*".to_string()), ("order", order_param(order))]);
        let response = self.send(request).await?;
        Self::read_rows(response).await
    }

    async fn create(&self, task: &NewTask) -> Result<Vec<Task>, RemoteError> {
        let request = self
            .client
            .post(self.table_url.clone())
            .query(&[("select", "*")])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[task]);
        let response = self.send(request).await?;
        Self::read_rows(response).await
    }

    async fn update_by_id(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<Vec<Task>, RemoteError> {
        let request = self
            .client
            .patch(self.table_url.clone())
            .query(&[("id", id_filter(id)), ("select", "*".to_string())])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);
        let response = self.send(request).await?;
        Self::read_rows(response).await
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.table_url.clone())
            .query(&[("id", id_filter(id))]);
        self.send(request).await?;
        Ok(())
    }
}
