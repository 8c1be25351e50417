use std::sync::OnceLock;

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

const ARGON2_MEMORY_KIB: u32 = 19_456;
const ARGON2_TIME: u32 = 2;
const ARGON2_PARALLELISM: u32 = 1;

const SESSION_TOKEN_BYTES: usize = 32;

static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("password hashing failed")]
    Hashing,
    #[error("password verification failed")]
    Verification,
}

fn argon2() -> Result<Argon2<'static>, argon2::Error> {
    let params = argon2::Params::new(ARGON2_MEMORY_KIB, ARGON2_TIME, ARGON2_PARALLELISM, None)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2().map_err(|_| SecurityError::Hashing)?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SecurityError::Hashing)?
        .to_string();

    Ok(hash)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::Verification)?;
    let argon2 = argon2().map_err(|_| SecurityError::Verification)?;

    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::Verification),
    }
}

/// Runs a full verification against a throwaway hash, so a login for an
/// unknown identifier costs as much as one with a wrong password.
pub(crate) fn verify_decoy_password(password: &str) {
    let hash = DECOY_HASH.get_or_init(|| hash_password("decoy-password-never-matches").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
}

/// Opaque value handed to the browser; only its digest is persisted.
pub(crate) fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").expect("hash");
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn decoy_verification_uses_a_real_argon2_hash() {
        verify_decoy_password("whatever");
        verify_decoy_password("whatever-else");

        let hash = DECOY_HASH.get().cloned().flatten().expect("decoy hash");
        let parsed = PasswordHash::new(&hash).expect("phc string");
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!verify_password("whatever", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn session_tokens_are_unique_and_url_safe() {
        let first = generate_session_token();
        let second = generate_session_token();

        assert_ne!(first, second);
        assert_eq!(first.len(), 43);
        assert!(first.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
    }

    #[test]
    fn session_token_hash_is_stable_hex() {
        let digest = hash_session_token("token-value");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_session_token("token-value"));
        assert_ne!(digest, hash_session_token("token-value2"));
    }
}
