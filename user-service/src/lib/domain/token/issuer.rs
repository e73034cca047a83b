use std::sync::Arc;
use std::sync::OnceLock;

use auth::ClaimSet;
use auth::Clock;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;

use super::errors::AuthenticationError;
use super::models::Credentials;
use super::models::IssuedToken;
use crate::user::ports::UserRepository;

/// Argon2id hash verified when there is no stored hash to check, so a login
/// for an unknown user costs the same as a wrong password.
fn dummy_hash(password_hasher: &PasswordHasher) -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| match password_hasher.hash("dummy-password-never-stored") {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Could not prepare dummy password hash");
                None
            }
        })
        .as_deref()
}

/// Turns a login attempt into a signed token.
///
/// Every credential problem collapses into `AuthenticationFailed`; the
/// precise reason is only logged.
pub struct TokenIssuer<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    codec: Arc<TokenCodec>,
    password_hasher: PasswordHasher,
    dummy_hash: Option<&'static str>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
}

impl<UR> TokenIssuer<UR>
where
    UR: UserRepository,
{
    /// Create a token issuer.
    ///
    /// # Arguments
    /// * `repository` - User directory used to resolve the login subject
    /// * `codec` - Signs the claim set
    /// * `clock` - Time source, shared with the authenticator
    /// * `lifetime` - Positive validity window of every issued token
    pub fn new(
        repository: Arc<UR>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
        lifetime: Duration,
    ) -> Self {
        let password_hasher = PasswordHasher::new();
        let dummy_hash = dummy_hash(&password_hasher);
        Self {
            repository,
            codec,
            password_hasher,
            dummy_hash,
            clock,
            lifetime,
        }
    }

    /// Validity window applied to every token.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Verify credentials and mint a token for the subject.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Missing secret, unknown user, user without
    ///   password, or wrong password
    /// * `DirectoryUnavailable` - User lookup failed
    /// * `Signing` - Token could not be encoded
    pub async fn generate_token(
        &self,
        credentials: &Credentials,
    ) -> Result<IssuedToken, AuthenticationError> {
        let user_id = credentials.user_id;

        let Some(secret) = credentials.secret.as_deref() else {
            tracing::debug!(user_id = %user_id, reason = "missing_secret", "Login rejected");
            return Err(AuthenticationError::AuthenticationFailed);
        };

        let user = self
            .repository
            .find_by_id(&user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "User lookup failed during login");
                AuthenticationError::from(e)
            })?
            .ok_or_else(|| {
                self.verify_dummy(secret);
                tracing::debug!(user_id = %user_id, reason = "unknown_user", "Login rejected");
                AuthenticationError::AuthenticationFailed
            })?;

        let Some(password_hash) = user.password_hash.as_deref() else {
            self.verify_dummy(secret);
            tracing::debug!(user_id = %user_id, reason = "no_password", "Login rejected");
            return Err(AuthenticationError::AuthenticationFailed);
        };

        match self.password_hasher.verify(secret, password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = %user_id, reason = "wrong_password", "Login rejected");
                return Err(AuthenticationError::AuthenticationFailed);
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Stored password hash is unusable");
                return Err(AuthenticationError::AuthenticationFailed);
            }
        }

        let claims = ClaimSet::new(user.id.0, self.clock.now(), self.lifetime);
        let token = self.codec.encode(&claims).map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Token signing failed");
            AuthenticationError::from(e)
        })?;

        tracing::info!(user_id = %user_id, expires_at = claims.exp, "Token issued");

        Ok(IssuedToken { token })
    }

    /// Run a verification whose outcome is discarded.
    fn verify_dummy(&self, secret: &str) {
        if let Some(hash) = self.dummy_hash {
            let _ = self.password_hasher.verify(secret, hash);
        }
    }
}
