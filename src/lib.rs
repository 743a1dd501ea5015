//! Authlab - credential login with server-side sessions
//!
//! This is the library interface for Authlab: a credential store backed by
//! bcrypt hashes, an in-memory session registry with fixed 30 minute expiry,
//! and the small HTTP API that ties them together.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::Error;
