use auth::JwtError;
use thiserror::Error;

use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Failures of token issuance and token authentication.
///
/// The `Display` text of `AuthenticationFailed` is the only one ever shown to
/// a client at login; it must not reveal whether the account exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token subject {0} does not exist")]
    NoSuchSubject(UserId),

    // Server-side failures, never caused by the caller's input
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

impl AuthenticationError {
    /// True for every kind that means "the caller is not authenticated".
    ///
    /// Signing and directory failures are server errors instead.
    pub fn is_authentication_failure(&self) -> bool {
        !matches!(
            self,
            AuthenticationError::Signing(_) | AuthenticationError::DirectoryUnavailable(_)
        )
    }

    /// Short stable name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthenticationError::AuthenticationFailed => "authentication_failed",
            AuthenticationError::MalformedToken(_) => "malformed_token",
            AuthenticationError::BadSignature => "bad_signature",
            AuthenticationError::TokenExpired => "token_expired",
            AuthenticationError::NoSuchSubject(_) => "no_such_subject",
            AuthenticationError::Signing(_) => "signing",
            AuthenticationError::DirectoryUnavailable(_) => "directory_unavailable",
        }
    }
}

impl From<JwtError> for AuthenticationError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(msg) => AuthenticationError::Signing(msg),
            JwtError::MalformedToken(msg) => AuthenticationError::MalformedToken(msg),
            JwtError::BadSignature => AuthenticationError::BadSignature,
        }
    }
}

impl From<UserError> for AuthenticationError {
    fn from(err: UserError) -> Self {
        AuthenticationError::DirectoryUnavailable(err.to_string())
    }
}
