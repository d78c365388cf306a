//! Driven port for one-way, salted secret hashing.

use async_trait::async_trait;

use crate::domain::CredentialHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialHasherError {
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored credential hash is malformed: {message}",
        /// Hashing or comparison could not be performed.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

/// Hash and compare secrets.
///
/// `verify` must compare in constant time with respect to the secret; a
/// mismatch is `Ok(false)`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash of `secret`.
    async fn hash(&self, secret: &str) -> Result<CredentialHash, CredentialHasherError>;

    /// Check `secret` against a previously produced `hash`.
    async fn verify(
        &self,
        secret: &str,
        hash: &CredentialHash,
    ) -> Result<bool, CredentialHasherError>;
}
