//! Frontend Models
//!
//! Data structures matching the remote todo service.

use serde::{Deserialize, Serialize};

pub type TodoId = u32;
pub type UserId = u32;

/// Todo record (matches remote resource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// User record. The service sends more fields; only these are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A todo built on the client, before the server assigns its id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub user_id: UserId,
    pub title: String,
    pub completed: bool,
}

impl TodoDraft {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Body of the partial update sent when a checkbox is toggled
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletedPatch {
    pub completed: bool,
}

/// Raw values read from the new-todo form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitForm {
    pub user: String,
    pub todo: String,
}
