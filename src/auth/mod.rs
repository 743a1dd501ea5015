//! Authentication and session management

pub mod credentials;
pub mod error;
pub mod middleware;
pub mod models;
pub mod session;

pub use credentials::CredentialStore;
pub use error::AuthError;
pub use middleware::{token_from_headers, CookieSettings, CurrentUser, LoginBody};
pub use models::{Account, AccountId, LoginRequest, StatusResponse, WhoamiResponse};
pub use session::{generate_token, Session, SessionRegistry, SESSION_TTL_SECS};
