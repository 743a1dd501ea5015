//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::auth::credentials::stored_hash_cost;
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    /// Work factor used when hashing plaintext passwords at startup
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![AccountConfig {
        id: 1,
        username: "student".to_string(),
        password_hash: None,
        password: Some("password123".to_string()),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            accounts: default_accounts(),
        }
    }
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for any path outside /api
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the cookie `Secure`. Turn off only when nothing terminates TLS
    /// in front of the service.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,

    /// Periodically drop expired sessions. Lookups expire lazily regardless.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_secure_cookie() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secure_cookie: default_secure_cookie(),
            sweep_interval_secs: None,
        }
    }
}

/// A statically configured account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub id: u64,

    pub username: String,

    /// Pre-computed bcrypt hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Plaintext password, hashed once at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccountConfig {
    /// Describe how the password is stored, without revealing it
    pub fn credential_kind(&self) -> &'static str {
        match (&self.password_hash, &self.password) {
            (Some(_), _) => "bcrypt hash",
            (None, Some(_)) => "plaintext (hashed at startup)",
            (None, None) => "missing",
        }
    }
}

impl Config {
    /// Check account entries for duplicates and missing credentials
    pub fn validate(&self) -> Result<()> {
        let mut usernames = HashSet::new();
        let mut ids = HashSet::new();

        for account in &self.accounts {
            if account.username.is_empty() {
                return Err(Error::Config("account username must not be empty".to_string()));
            }
            if !usernames.insert(account.username.as_str()) {
                return Err(Error::DuplicateAccount(account.username.clone()));
            }
            if !ids.insert(account.id) {
                return Err(Error::DuplicateAccount(format!("id {}", account.id)));
            }
            match (&account.password_hash, &account.password) {
                (Some(hash), _) => {
                    stored_hash_cost(hash).map_err(|_| {
                        Error::Config(format!(
                            "account '{}' has a malformed password_hash",
                            account.username
                        ))
                    })?;
                }
                (None, Some(_)) => {}
                (None, None) => {
                    return Err(Error::Config(format!(
                        "account '{}' needs either password_hash or password",
                        account.username
                    )));
                }
            }
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(Error::Config(format!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }

        if self.session.cookie_name.is_empty() {
            return Err(Error::Config("session.cookie_name must not be empty".to_string()));
        }

        Ok(())
    }
}
