//! Authentication Errors
//! Mission: One discriminated error surface for every auth operation

/// Every way an auth operation can fail. Returned as values, never panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Credential document missing or unparseable
    LoadUsers,
    /// Credential document could not be written
    SaveUsers,
    UserNotFound,
    UserExists,
    /// Record exists but carries no password hash
    NoHash,
    InvalidPassword,
    /// Password outside the 10..=160 byte bounds
    PasswordLength,
    /// Session table is full
    SessionLimit,
    SessionExpired,
    SessionNotFound,
    /// Request carried no session cookie at all
    NoSession,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            AuthError::LoadUsers => "Failed to load user database",
            AuthError::SaveUsers => "Failed to save user database",
            AuthError::UserNotFound => "User not found",
            AuthError::UserExists => "User already exists",
            AuthError::NoHash => "User has no password hash",
            AuthError::InvalidPassword => "Invalid password",
            AuthError::PasswordLength => "Password length out of bounds",
            AuthError::SessionLimit => "Session limit reached",
            AuthError::SessionExpired => "Session expired",
            AuthError::SessionNotFound => "Session not found",
            AuthError::NoSession => "No session cookie",
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for AuthError {}
