//! Error Types
//!
//! Failures surfaced by the remote adapter and the synchronizer.

use thiserror::Error;

use crate::models::{TodoId, UserId};

/// Remote adapter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure or a body that did not parse
    #[error("Network error: {0}")]
    Network(String),

    /// The request went through but the status was not a success
    #[error("Failed to {operation}: server responded with status {status}. Please try later.")]
    ServerRejected { operation: &'static str, status: u16 },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Synchronizer errors, each reported to the user once
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A todo refers to a user that is not loaded
    #[error("No user with id {0}")]
    Lookup(UserId),

    /// The server handed out an id that is already on screen
    #[error("Todo {0} is already in the list; the older entry was replaced")]
    DuplicateId(TodoId),

    #[error("Invalid user selection: {0:?}")]
    InvalidSelection(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
