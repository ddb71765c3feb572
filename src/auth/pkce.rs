//! PKCE (RFC 7636) verifier and `S256` challenge generation for federated sign-in.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Random bytes behind a verifier; encodes to 43 characters.
const VERIFIER_BYTES: usize = 32;

pub const CHALLENGE_METHOD: &str = "s256";

#[derive(Debug)]
pub struct PkcePair {
    pub verifier: SecretString,
    pub challenge: String,
}

#[must_use]
pub fn generate() -> PkcePair {
    let mut bytes = [0u8; VERIFIER_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let verifier = SecretString::from(Base64UrlUnpadded::encode_string(&bytes));
    let challenge = compute_challenge(&verifier);
    PkcePair {
        verifier,
        challenge,
    }
}

#[must_use]
pub fn compute_challenge(verifier: &SecretString) -> String {
    let digest = Sha256::digest(verifier.expose_secret().as_bytes());
    Base64UrlUnpadded::encode_string(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_safe(value: &str) -> bool {
        value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    #[test]
    fn verifier_is_url_safe_and_within_rfc_length() {
        let pair = generate();
        let verifier = pair.verifier.expose_secret();
        assert_eq!(verifier.len(), 43);
        assert!(url_safe(verifier));
    }

    #[test]
    fn challenge_is_deterministic_sha256() {
        let verifier = SecretString::from("a".repeat(43));
        let first = compute_challenge(&verifier);
        let second = compute_challenge(&verifier);
        assert_eq!(first, second);
        assert_eq!(first.len(), 43);
        assert!(url_safe(&first));
        assert_ne!(first, verifier.expose_secret());
    }

    #[test]
    fn pairs_are_unique() {
        let first = generate();
        let second = generate();
        assert_ne!(
            first.verifier.expose_secret(),
            second.verifier.expose_secret()
        );
        assert_ne!(first.challenge, second.challenge);
        assert_eq!(first.challenge, compute_challenge(&first.verifier));
    }
}
