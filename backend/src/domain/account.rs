//! Account identity records.
//!
//! An [`Account`] is created exactly once through the repository and only read
//! afterwards. The identifier is assigned by the store; timestamps and the
//! active flag are stamped by the repository, never by the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

/// Length of an [`AccountId`] in bytes.
pub const ACCOUNT_ID_LEN: usize = 12;

/// Validation errors returned by account constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    /// Identifier is not 24 hexadecimal characters.
    MalformedId,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedId => write!(f, "account id must be 24 hexadecimal characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Store-native 12-byte account identifier rendered as 24 lowercase hex
/// characters.
///
/// # Examples
/// ```
/// use idp::domain::AccountId;
///
/// let id: AccountId = "65f1a2b3c4d5e6f708192a3b".parse().unwrap();
/// assert_eq!(id.to_string(), "65f1a2b3c4d5e6f708192a3b");
/// assert!("not-a-hex-id".parse::<AccountId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// Wrap raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Decode an identifier from its hex form.
    pub fn parse_hex(raw: &str) -> Result<Self, AccountValidationError> {
        if raw.len() != ACCOUNT_ID_LEN * 2 {
            return Err(AccountValidationError::MalformedId);
        }
        let mut bytes = [0_u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| AccountValidationError::MalformedId)?;
        Ok(Self(bytes))
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One-way salted hash of a secret, in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::CredentialHasher`].
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Input for account creation, validated before any hashing or store access.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved.
#[derive(Clone)]
pub struct NewAccount {
    email: String,
    password: Zeroizing<String>,
}

impl NewAccount {
    /// Construct from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email to register.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext secret to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persisted identity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Store-assigned identifier; immutable once set.
    pub id: AccountId,
    pub email: String,
    pub credential_hash: CredentialHash,
    /// Soft-delete gate honoured by id lookups.
    pub active: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-hex-id")]
    #[case("65f1a2b3c4d5e6f708192a3")]
    #[case("65f1a2b3c4d5e6f708192a3b0")]
    #[case("zzf1a2b3c4d5e6f708192a3b")]
    #[case(" 65f1a2b3c4d5e6f708192a3")]
    fn malformed_identifiers_are_rejected(#[case] raw: &str) {
        assert_eq!(
            AccountId::parse_hex(raw),
            Err(AccountValidationError::MalformedId)
        );
    }

    #[test]
    fn uppercase_hex_is_accepted_and_normalised() {
        let id = AccountId::parse_hex("65F1A2B3C4D5E6F708192A3B").expect("valid hex");
        assert_eq!(id.to_string(), "65f1a2b3c4d5e6f708192a3b");
    }

    #[rstest]
    #[case("", "pw", AccountValidationError::EmptyEmail)]
    #[case("   ", "pw", AccountValidationError::EmptyEmail)]
    #[case("a@b.com", "", AccountValidationError::EmptyPassword)]
    fn new_account_requires_email_and_password(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AccountValidationError,
    ) {
        let err = NewAccount::try_from_parts(email, password).expect_err("invalid input");
        assert_eq!(err, expected);
    }

    #[test]
    fn new_account_trims_email_and_keeps_password_whitespace() {
        let account = NewAccount::try_from_parts("  a@b.com ", " secret ").expect("valid");
        assert_eq!(account.email(), "a@b.com");
        assert_eq!(account.password(), " secret ");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let account = NewAccount::try_from_parts("a@b.com", "hunter2").expect("valid");
        let hash = CredentialHash::new("$argon2id$v=19$...");
        assert!(!format!("{account:?}").contains("hunter2"));
        assert!(!format!("{hash:?}").contains("argon2id"));
    }
}
