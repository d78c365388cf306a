//! Argon2id credential hashing.
//!
//! Hashes are PHC strings with a fresh 16-byte salt per call. Both operations
//! are CPU-bound and run on the blocking pool.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use password_hash::{PasswordHash, SaltString};
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::CredentialHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

const SALT_LEN: usize = 16;

/// [`CredentialHasher`] backed by Argon2id with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(secret: &str) -> Result<CredentialHash, CredentialHasherError> {
    let mut salt_bytes = [0_u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
        .to_string();
    Ok(CredentialHash::new(phc))
}

fn verify_blocking(secret: &str, hash: &str) -> Result<bool, CredentialHasherError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, secret: &str) -> Result<CredentialHash, CredentialHasherError> {
        let secret = Zeroizing::new(secret.to_owned());
        task::spawn_blocking(move || hash_blocking(&secret))
            .await
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
    }

    async fn verify(
        &self,
        secret: &str,
        hash: &CredentialHash,
    ) -> Result<bool, CredentialHasherError> {
        let secret = Zeroizing::new(secret.to_owned());
        let hash = hash.as_str().to_owned();
        task::spawn_blocking(move || verify_blocking(&secret, &hash))
            .await
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn hash_then_verify_accepts_the_original_secret() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("correct horse"));
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn verify_reports_mismatch_as_false() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(!hasher.verify("battery staple", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn hashing_is_salted() {
        let hasher = Argon2CredentialHasher::new();
        let first = hasher.hash("same").await.expect("hash");
        let second = hasher.hash("same").await.expect("hash");

        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[case("")]
    #[case("plaintext")]
    #[case("not$a$phc")]
    #[tokio::test]
    async fn verify_rejects_malformed_hashes(#[case] stored: &str) {
        let hasher = Argon2CredentialHasher::new();

        let err = hasher
            .verify("secret", &CredentialHash::new(stored))
            .await
            .expect_err("malformed hash");

        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }
}
