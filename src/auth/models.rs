//! Authentication models

use serde::{Deserialize, Serialize};

/// Account identifier
pub type AccountId = u64;

/// A login account. Built once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,
    /// Username for login, unique across accounts
    pub username: String,
    /// bcrypt hash of the account password
    pub password_hash: String,
}

impl Account {
    pub fn new(id: AccountId, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for login and logout responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Body for `/api/me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhoamiResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl WhoamiResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            username: None,
        }
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            username: Some(username.into()),
        }
    }
}
