//! Client Configuration
//!
//! Remote base URL and fetch limits. Read at startup from an optional
//! `window.__TODO_CLIENT_CONFIG__` object; every field falls back to its default.

use serde::{Deserialize, Serialize};

use crate::models::TodoId;

/// Name of the global JS object holding overrides
pub const CONFIG_GLOBAL: &str = "__TODO_CLIENT_CONFIG__";

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    /// `_limit` for the todo list request (None = no limit)
    pub todo_limit: Option<u32>,
    /// `_limit` for the user list request (None = no limit)
    pub user_limit: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            todo_limit: Some(7),
            user_limit: Some(5),
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(raw).map(Self::normalized)
    }

    /// Read overrides from the page, or defaults if none are set
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = match js_sys::Reflect::get(&window, &CONFIG_GLOBAL.into()) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return Self::default(),
        };
        // Either an object literal or a JSON string
        let parsed = match value.as_string() {
            Some(raw) => Self::from_json(&raw).map_err(|e| e.to_string()),
            None => serde_wasm_bindgen::from_value::<Self>(value)
                .map(Self::normalized)
                .map_err(|e| e.to_string()),
        };
        match parsed {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed {}: {}", CONFIG_GLOBAL, e);
                Self::default()
            }
        }
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    pub fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}
