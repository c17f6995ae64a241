//! Remote Store Adapter
//!
//! The five remote operations the board needs, behind an async trait so the
//! synchronizer can run against the HTTP service or an in-memory fake.

mod http;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Todo, TodoDraft, TodoId, User};

pub use http::HttpTodoApi;

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote todo store
///
/// Every call is independent: no batching, caching or retry.
#[async_trait(?Send)]
pub trait TodoApi {
    /// List todos (bounded by the configured limit)
    async fn list_todos(&self) -> ApiResult<Vec<Todo>>;

    /// List users (bounded by the configured limit)
    async fn list_users(&self) -> ApiResult<Vec<User>>;

    /// Create a todo; the returned record carries the server-assigned id
    async fn create_todo(&self, draft: &TodoDraft) -> ApiResult<Todo>;

    /// Update the completion flag of one todo
    async fn set_completed(&self, id: TodoId, completed: bool) -> ApiResult<()>;

    /// Delete one todo. `Ok` means the server confirmed the delete.
    async fn delete_todo(&self, id: TodoId) -> ApiResult<()>;
}
