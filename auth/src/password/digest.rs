use std::fmt::Write;

use sha2::Digest;
use sha2::Sha512;

/// Length of a hex-encoded SHA-512 digest.
pub const SHA512_HEX_LEN: usize = 128;

/// Lowercase hex SHA-512 digest of a secret.
///
/// Format used by stored credentials that predate Argon2 hashing.
pub fn sha512_hex(secret: &str) -> String {
    Sha512::digest(secret.as_bytes())
        .iter()
        .fold(String::with_capacity(SHA512_HEX_LEN), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// Whether `candidate` looks like a hex-encoded SHA-512 digest.
pub fn is_sha512_hex(candidate: &str) -> bool {
    candidate.len() == SHA512_HEX_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Compare two byte strings without short-circuiting on the first difference.
///
/// Only the length is allowed to leak.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha512_hex_known_vector() {
        assert_eq!(
            sha512_hex("abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_is_sha512_hex() {
        assert!(is_sha512_hex(&sha512_hex("secret")));
        assert!(is_sha512_hex(&sha512_hex("secret").to_uppercase()));
        assert!(!is_sha512_hex("abc"));
        assert!(!is_sha512_hex(&"z".repeat(SHA512_HEX_LEN)));
        assert!(!is_sha512_hex("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"token", b"token"));
        assert!(!constant_time_eq(b"token", b"tokem"));
        assert!(!constant_time_eq(b"token", b"token2"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
