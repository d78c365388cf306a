//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. HTTP handler tests substitute a mock instead of wiring a
//! store, a hasher and a signer.

use async_trait::async_trait;

use crate::domain::{Error, LoginAttempt, SessionToken};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify the attempt and issue a signed session token.
    async fn authenticate(&self, attempt: &LoginAttempt) -> Result<SessionToken, Error>;
}
