use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::UserId;

/// A single login attempt.
///
/// `secret` is `None` when no password was supplied at all.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: UserId,
    pub secret: Option<String>,
}

impl Credentials {
    pub fn new(user_id: UserId, secret: Option<String>) -> Self {
        Self { user_id, secret }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Result of a successful login, serialized as `{"token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
}
