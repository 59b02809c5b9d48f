//! Authenticator
//! Mission: Tie the credential and session stores into one login/logout surface

use crate::auth::credentials::CredentialStore;
use crate::auth::error::AuthError;
use crate::auth::sessions::{Session, SessionStore};
use tracing::{info, warn};

/// Orchestrates CredentialStore + SessionStore. One instance is shared
/// across every request handler.
pub struct Authenticator {
    credentials: CredentialStore,
    sessions: SessionStore,
}

impl Authenticator {
    pub fn new(credentials: CredentialStore, sessions: SessionStore) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Verify a username/password pair and open a session for it.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if let Err(e) = self.credentials.verify_password(username, password) {
            warn!("❌ Failed login attempt: {}", username);
            return Err(e);
        }

        let session = self.sessions.create(username)?;
        info!("🔐 Login successful: {}", username);
        Ok(session)
    }

    /// Validate the session carried by a request's Cookie header.
    pub fn check_request(&self, cookie_header: Option<&str>) -> Result<Session, AuthError> {
        let header = cookie_header.ok_or(AuthError::NoSession)?;
        let session_id = session_id_from_cookie(header).ok_or(AuthError::NoSession)?;
        self.sessions.validate(&session_id)
    }

    pub fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.invalidate(session_id)
    }

    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.credentials
            .change_password(username, old_password, new_password)
    }

    pub fn create_user(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.credentials.create(username, password)
    }

    /// Deleting a user does not touch that user's live sessions; they stay
    /// usable until natural expiry or logout.
    pub fn delete_user(&self, username: &str) -> Result<(), AuthError> {
        self.credentials.delete(username)
    }
}

/// Pull the `session` cookie value out of a Cookie header. Pairs are split
/// on `;`, names matched exactly, values read up to the next delimiter or
/// end of string.
pub fn session_id_from_cookie(header: &str) -> Option<String> {
    for pair in header.split(';') {
        let pair = pair.trim_start();
        if let Some(value) = pair.strip_prefix("session=") {
            return Some(value.to_string());
        }
    }
    None
}
