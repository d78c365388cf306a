//! Authentication primitives: login attempts and session claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::AccountId;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login identifier was missing or blank once trimmed.
    EmptyIdentifier,
    /// Login secret was blank.
    EmptySecret,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "login identifier must not be empty"),
            Self::EmptySecret => write!(f, "login secret must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Transient login input: an identifier matched against account emails and a
/// plaintext secret that is never persisted or logged.
///
/// ## Invariants
/// - `identifier` is trimmed and must not be empty after trimming.
/// - `secret` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use idp::domain::LoginAttempt;
///
/// let attempt = LoginAttempt::try_from_parts("a@b.com", "password").unwrap();
/// assert_eq!(attempt.identifier(), "a@b.com");
/// assert_eq!(attempt.secret(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    identifier: String,
    secret: Zeroizing<String>,
}

impl LoginAttempt {
    /// Construct an attempt from raw identifier/secret inputs.
    pub fn try_from_parts(identifier: &str, secret: &str) -> Result<Self, LoginValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }

        if secret.is_empty() {
            return Err(LoginValidationError::EmptySecret);
        }

        Ok(Self {
            identifier: normalized.to_owned(),
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Identifier suitable for account lookups.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Secret provided by the caller.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}

impl fmt::Debug for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAttempt")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Standard time-bounded claim set carried by a session token.
///
/// Times are seconds since the Unix epoch, as in the compact token format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub aud: String,
    /// Account identifier in hex form.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for `subject` issued at `now` and expiring after `ttl`.
    ///
    /// Returns `None` when the expiry cannot be represented.
    pub fn issue(
        issuer: &str,
        audience: &str,
        subject: &AccountId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            iss: issuer.to_owned(),
            aud: audience.to_owned(),
            sub: subject.to_hex(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

/// Issuer, audience and lifetime applied to every issued session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl TokenPolicy {
    /// Build a policy.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, ttl: Duration) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        }
    }

    /// Claims for `subject` issued at `now` under this policy, or `None` if
    /// the expiry overflows.
    pub fn claims_for(&self, subject: &AccountId, now: DateTime<Utc>) -> Option<SessionClaims> {
        SessionClaims::issue(&self.issuer, &self.audience, subject, now, self.ttl)
    }
}

/// Signed session token in compact serialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a compact signed token.
    pub fn new(compact: impl Into<String>) -> Self {
        Self(compact.into())
    }

    /// Compact token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the compact string.
    pub fn into_inner(self) -> String {
        self.0
    }
}
