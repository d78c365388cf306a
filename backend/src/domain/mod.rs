//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: define the identity-provider model independently of HTTP and of
//! any particular store or crypto library. Adapters reach the domain through
//! the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode / ErrorReason: transport-agnostic failure descriptor.
//! - Account, AccountId, CredentialHash, NewAccount: identity records.
//! - LoginAttempt, SessionClaims, SessionToken, TokenPolicy: login inputs
//!   and issued tokens.
//! - AccountRepository, AccountService, AuthenticationService: use-cases.

pub mod account;
pub mod account_repository;
pub mod account_service;
pub mod auth;
pub mod authentication_service;
pub mod error;
pub mod ports;

pub use self::account::{
    ACCOUNT_ID_LEN, Account, AccountId, AccountValidationError, CredentialHash, NewAccount,
};
pub use self::account_repository::{AccountRepository, AccountRepositoryError};
pub use self::account_service::AccountService;
pub use self::auth::{
    LoginAttempt, LoginValidationError, SessionClaims, SessionToken, TokenPolicy,
};
pub use self::authentication_service::AuthenticationService;
pub use self::error::{Error, ErrorCode, ErrorReason, ErrorValidationError};
