use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set embedded in every access token.
///
/// Serialized as `{"userId": .., "iat": .., "exp": ..}` with Unix timestamps
/// in whole seconds, so a claim set survives an encode/decode cycle unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClaimSet {
    /// Subject (numeric user identifier)
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl ClaimSet {
    /// Create claims for a subject, valid for `lifetime` starting at `issued_at`.
    ///
    /// # Arguments
    /// * `user_id` - Subject identifier
    /// * `issued_at` - Mint instant (truncated to whole seconds)
    /// * `lifetime` - Validity window, expected to be positive
    ///
    /// # Returns
    /// Claims with iat and exp set
    pub fn new(user_id: i64, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            user_id,
            iat,
            exp: iat + lifetime.num_seconds(),
        }
    }

    /// Issue instant, if representable.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the claims are expired at `now`.
    ///
    /// A token is no longer valid from the expiry second onwards.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
