//! Authentication utilities library
//!
//! Provides the building blocks for token-based authentication:
//! - Password hashing (Argon2id, with verification of legacy SHA-512 digests)
//! - Signed, time-bounded access tokens (JWT, HMAC-SHA-512)
//! - An injectable clock so expiry decisions are deterministic under test
//!
//! Services define their own user lookup and compose these pieces.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{ClaimSet, TokenCodec};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let claims = ClaimSet::new(42, issued_at, Duration::days(1));
//!
//! let token = codec.encode(&claims).unwrap();
//! let decoded: ClaimSet = codec.decode(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```
//!
//! ## Expiry
//! ```
//! use auth::{ClaimSet, Clock, ManualClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
//! let claims = ClaimSet::new(42, clock.now(), Duration::hours(1));
//! assert!(!claims.is_expired(clock.now()));
//!
//! clock.advance(Duration::hours(1));
//! assert!(claims.is_expired(clock.now()));
//! ```

pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::ClaimSet;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::constant_time_eq;
pub use password::PasswordError;
pub use password::PasswordHasher;
