//! Challenge-response password digest.
//!
//! The SharePort web UI never sends the plaintext password. It appends the
//! server-issued challenge to the username and hashes that with HMAC-MD5,
//! keyed by the password. The lowercase hex form of the MAC is what gets
//! posted as the `password` form field.

use hmac::{Hmac, Mac};
use md5::Md5;

type HmacMd5 = Hmac<Md5>;

/// Computes the login digest for a challenge.
///
/// Returns the lowercase hex HMAC-MD5 of `username ++ challenge` keyed by
/// `password`.
pub fn challenge_digest(username: &str, challenge: &str, password: &str) -> String {
    let mut mac =
        HmacMd5::new_from_slice(password.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(username.as_bytes());
    mac.update(challenge.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rfc2104_vector() {
        // RFC 2104 test case 2, split across username and challenge
        let digest = challenge_digest("what do ya want ", "for nothing?", "Jefe");
        assert_eq!(digest, "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn test_known_login_digest() {
        let digest = challenge_digest("admin", "xyz", "secret");
        assert_eq!(digest, "5d9bc903095e96fc1d927eeed24a5edb");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(
            challenge_digest("", "", ""),
            "74e6f7298a9c2d168935f58c001bad88"
        );
    }

    #[test]
    fn test_different_challenge_changes_digest() {
        let a = challenge_digest("admin", "challenge-1", "secret");
        let b = challenge_digest("admin", "challenge-2", "secret");
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_digest_is_deterministic(
            user in ".{0,32}",
            challenge in "[A-Za-z0-9]{0,64}",
            password in ".{0,32}",
        ) {
            let first = challenge_digest(&user, &challenge, &password);
            let second = challenge_digest(&user, &challenge, &password);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_digest_is_lowercase_hex(
            user in ".{0,32}",
            challenge in ".{0,64}",
            password in ".{0,32}",
        ) {
            let digest = challenge_digest(&user, &challenge, &password);
            prop_assert_eq!(digest.len(), 32);
            prop_assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
