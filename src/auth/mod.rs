//! Authentication Module
//! Mission: Session-based access control for the admin gateway

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod sessions;

pub use authenticator::{session_id_from_cookie, Authenticator};
pub use credentials::{BcryptScheme, CredentialStore, PasswordScheme, UserRecord};
pub use error::AuthError;
pub use sessions::{Session, SessionStore, SESSION_LIMIT, SESSION_TIMEOUT_SECS};
