//! Handshake error types.

use thiserror::Error;

/// Why a handshake was refused.
///
/// The display strings are the exact close reasons sent to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No token was presented.
    #[error("Authentication error")]
    MissingToken,

    /// The token failed verification (bad signature, malformed, expired).
    #[error("Invalid token")]
    InvalidToken,

    /// The token verified but its subject is not in the directory.
    #[error("User not found")]
    UserNotFound,
}

pub type AuthResult<T> = Result<T, AuthError>;
