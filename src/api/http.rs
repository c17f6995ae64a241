//! HTTP Adapter
//!
//! `TodoApi` over the JSON resource API (`/todos`, `/users`).
//! Uses the browser's fetch on wasm32 through reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{ApiResult, TodoApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{CompletedPatch, Todo, TodoDraft, TodoId, User};

const JSON_UTF8: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    config: ClientConfig,
}

impl HttpTodoApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        url: String,
        limit: Option<u32>,
        operation: &'static str,
    ) -> ApiResult<Vec<T>> {
        let mut request = self.client.get(url);
        if let Some(limit) = limit {
            request = request.query(&[("_limit", limit)]);
        }
        let response = check_status(request.send().await?, operation)?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success status into `ServerRejected`
fn check_status(response: Response, operation: &'static str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::ServerRejected {
            operation,
            status: status.as_u16(),
        })
    }
}

fn to_json_body<T: serde::Serialize>(body: &T) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Network(e.to_string()))
}

#[async_trait(?Send)]
impl TodoApi for HttpTodoApi {
    async fn list_todos(&self) -> ApiResult<Vec<Todo>> {
        self.list(self.config.todos_url(), self.config.todo_limit, "load todos")
            .await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.list(self.config.users_url(), self.config.user_limit, "load users")
            .await
    }

    async fn create_todo(&self, draft: &TodoDraft) -> ApiResult<Todo> {
        let response = self
            .client
            .post(self.config.todos_url())
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(to_json_body(draft)?)
            .send()
            .await?;
        let response = check_status(response, "create todo")?;
        Ok(response.json().await?)
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> ApiResult<()> {
        let response = self
            .client
            .patch(self.config.todo_url(id))
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(to_json_body(&CompletedPatch { completed })?)
            .send()
            .await?;
        check_status(response, "update todo")?;
        Ok(())
    }

    async fn delete_todo(&self, id: TodoId) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.config.todo_url(id))
            .header(CONTENT_TYPE, JSON_UTF8)
            .send()
            .await?;
        check_status(response, "delete todo")?;
        Ok(())
    }
}
