use std::sync::Arc;

use auth::ClaimSet;
use auth::Clock;
use auth::TokenCodec;

use super::errors::AuthenticationError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Converts a presented token into the user it was issued for.
///
/// The signature is the trust anchor: the password is not checked again.
pub struct TokenAuthenticator<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<UR> TokenAuthenticator<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            codec,
            clock,
        }
    }

    /// Authenticate a token.
    ///
    /// # Arguments
    /// * `token` - Compact token string as presented by the client
    ///
    /// # Returns
    /// The user named by the token's subject
    ///
    /// # Errors
    /// * `MalformedToken` - Token could not be parsed
    /// * `BadSignature` - Token was not signed with our key or was altered
    /// * `TokenExpired` - Expiry instant has been reached
    /// * `NoSuchSubject` - Token is valid but its user no longer exists
    /// * `DirectoryUnavailable` - User lookup failed
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthenticationError> {
        let claims: ClaimSet = self.codec.decode(token)?;

        if claims.is_expired(self.clock.now()) {
            return Err(AuthenticationError::TokenExpired);
        }

        let user_id = UserId(claims.user_id);

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthenticationError::NoSuchSubject(user_id))?;

        tracing::debug!(user_id = %user.id, "Token authenticated");

        Ok(user)
    }
}
