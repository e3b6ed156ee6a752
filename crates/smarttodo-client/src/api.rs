use async_trait::async_trait;
use reqwest::{Client, Response};
use thiserror::Error;

use smarttodo_types::Task;
use smarttodo_types::api::{
    CreateTaskRequest, DeleteTaskRequest, ErrorBody, SuggestionsRequest, SuggestionsResponse,
    UpdateTaskRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. `message` is the server's
    /// `error` string when it sent one.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not signed in")]
    SignedOut,
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Short text fit for showing to the user. `fallback` is used when the
    /// server gave nothing better.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { status: 401, .. } | Self::SignedOut => {
                "Please sign in again".to_owned()
            }
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// The task endpoints as seen from the client. Every call carries the
/// caller's access token.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ClientError>;

    async fn create_task(&self, token: &str, description: &str) -> Result<Task, ClientError>;

    /// `Ok(None)` when the caller owns no task with this id.
    async fn set_completed(
        &self,
        token: &str,
        id: i64,
        completed: bool,
    ) -> Result<Option<Task>, ClientError>;

    async fn delete_task(&self, token: &str, id: i64) -> Result<(), ClientError>;

    async fn suggest(&self, token: &str, descriptions: &[String]) -> Result<Vec<String>, ClientError>;
}

/// [`TaskApi`] over HTTP against a SmartTodo server.
#[derive(Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ClientError> {
        let resp = self
            .client
            .get(self.url("/api/getTasks"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn create_task(&self, token: &str, description: &str) -> Result<Task, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/saveTask"))
            .bearer_auth(token)
            .json(&CreateTaskRequest {
                description: Some(description.to_owned()),
            })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn set_completed(
        &self,
        token: &str,
        id: i64,
        completed: bool,
    ) -> Result<Option<Task>, ClientError> {
        let resp = self
            .client
            .put(self.url("/api/updateTask"))
            .bearer_auth(token)
            .json(&UpdateTaskRequest {
                id: Some(id),
                completed: Some(completed),
            })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn delete_task(&self, token: &str, id: i64) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url("/api/deleteTask"))
            .bearer_auth(token)
            .json(&DeleteTaskRequest { id: Some(id) })
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn suggest(&self, token: &str, descriptions: &[String]) -> Result<Vec<String>, ClientError> {
        let resp = self
            .client
            .post(self.url("/api/suggestions"))
            .bearer_auth(token)
            .json(&SuggestionsRequest {
                tasks: descriptions.to_vec(),
            })
            .send()
            .await?;
        let body: SuggestionsResponse = check(resp).await?.json().await?;
        Ok(body.suggestions)
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .map(|body| body.error)
        .unwrap_or_default();

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
