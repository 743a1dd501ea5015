//! Error types for Authlab

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    #[error("Config file not found. Run 'authlab init' first.")]
    ConfigNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
