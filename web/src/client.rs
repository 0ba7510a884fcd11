//! [`TodoRepository`] that talks to the todo HTTP API.
//!
//! Lets the client state controller run against a remote server. Error
//! bodies are mapped back onto the domain taxonomy: 400 becomes
//! [`TodoError::Validation`], 404 [`TodoError::NotFound`], 5xx
//! [`TodoError::Storage`]; connection failures and unexpected answers become
//! [`TodoError::Transport`].

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use todo::{
    CreateTodoRequest, DeleteResponse, DeleteTodoRequest, NewTodo, Result, TodoError, TodoId,
    TodoItem, TodoPatch, TodoRepository, UpdateTodoRequest,
};

use crate::error::ErrorBody;

/// Default request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the todo API
#[derive(Clone, Debug)]
pub struct HttpTodoRepository {
    client: Client,
    base_url: String,
}

impl HttpTodoRepository {
    /// Client for the API served at `base_url` (e.g. `http://localhost:3000`)
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TodoError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Uses an existing `reqwest` client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
    }

    /// Sends `builder` and decodes a JSON answer with status `expected`
    async fn send<T: DeserializeOwned>(
        builder: RequestBuilder,
        expected: StatusCode,
        id: Option<TodoId>,
    ) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| TodoError::Transport(format!("Request failed: {e}")))?;

        if response.status() != expected {
            return Err(error_from(response, id).await);
        }
        response
            .json()
            .await
            .map_err(|e| TodoError::Transport(format!("Invalid response body: {e}")))
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        body: &B,
        expected: StatusCode,
        id: Option<TodoId>,
    ) -> Result<T> {
        Self::send(self.request(method, "/api/todos").json(body), expected, id).await
    }
}

/// Maps an error response onto [`TodoError`]
async fn error_from(response: Response, id: Option<TodoId>) -> TodoError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.to_string(),
    };

    match (status, id) {
        (StatusCode::BAD_REQUEST, _) => TodoError::Validation(message),
        (StatusCode::NOT_FOUND, Some(id)) => TodoError::NotFound(id),
        (status, _) if status.is_server_error() => TodoError::Storage(message),
        (status, _) => TodoError::Transport(format!("Unexpected status {status}: {message}")),
    }
}

impl TodoRepository for HttpTodoRepository {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list(&self) -> Result<Vec<TodoItem>> {
        Self::send(self.request(Method::GET, "/api/todos"), StatusCode::OK, None).await
    }

    #[tracing::instrument(skip(self, todo), fields(base_url = %self.base_url))]
    async fn create(&self, todo: NewTodo) -> Result<TodoItem> {
        let body = CreateTodoRequest::from(&todo);
        self.send_json(Method::POST, &body, StatusCode::CREATED, None)
            .await
    }

    #[tracing::instrument(skip(self, patch), fields(base_url = %self.base_url, %id))]
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem> {
        let body = UpdateTodoRequest::new(id, &patch);
        self.send_json(Method::PATCH, &body, StatusCode::OK, Some(id))
            .await
    }

    /// The API does not say whether a row existed, so success reports `true`.
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url, %id))]
    async fn delete(&self, id: TodoId) -> Result<bool> {
        let body = DeleteTodoRequest::new(id);
        let response: DeleteResponse = self
            .send_json(Method::DELETE, &body, StatusCode::OK, Some(id))
            .await?;
        Ok(response.success)
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .request(Method::GET, "/health")
            .send()
            .await
            .map_err(|e| TodoError::Transport(format!("API unreachable: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response, None).await)
        }
    }
}
