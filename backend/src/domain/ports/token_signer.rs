//! Driven port for signing and verifying session claims.

use crate::domain::{SessionClaims, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token signing adapters.
    pub enum TokenSignerError {
        /// Claims could not be signed.
        Signing { message: String } => "failed to sign session claims: {message}",
        /// Signature, issuer, audience or structure did not verify.
        Invalid { message: String } => "session token is invalid: {message}",
        /// The token verified but its expiry has passed.
        Expired => "session token has expired",
    }
}

/// Sign claims into a compact token and verify tokens back into claims.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSigner: Send + Sync {
    /// Sign `claims`.
    fn sign(&self, claims: &SessionClaims) -> Result<SessionToken, TokenSignerError>;

    /// Verify `token` and return its claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenSignerError>;
}
