//! Session State
//!
//! The todo and user collections fetched at startup. A collection is `None`
//! when its fetch failed.

use crate::error::{SyncError, SyncResult};
use crate::models::{Todo, User, UserId};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    todos: Option<Vec<Todo>>,
    users: Option<Vec<User>>,
}

impl SessionState {
    pub fn new(todos: Option<Vec<Todo>>, users: Option<Vec<User>>) -> Self {
        Self { todos, users }
    }

    /// Todos as fetched at startup. Not updated by later create/update/delete.
    pub fn todos(&self) -> Option<&[Todo]> {
        self.todos.as_deref()
    }

    pub fn users(&self) -> Option<&[User]> {
        self.users.as_deref()
    }

    pub fn users_loaded(&self) -> bool {
        self.users.is_some()
    }

    /// Display name of the owning user
    pub fn user_name(&self, user_id: UserId) -> SyncResult<&str> {
        self.users
            .iter()
            .flatten()
            .find(|user| user.id == user_id)
            .map(|user| user.name.as_str())
            .ok_or(SyncError::Lookup(user_id))
    }
}
