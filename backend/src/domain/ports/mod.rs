//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_store;
mod accounts;
mod credential_hasher;
mod login_service;
mod token_signer;

pub use account_store::{AccountDocument, AccountFilter, AccountStore, AccountStoreError};
#[cfg(test)]
pub use account_store::MockAccountStore;
pub use accounts::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use accounts::{MockAccountCommand, MockAccountQuery};
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use token_signer::{TokenSigner, TokenSignerError};
#[cfg(test)]
pub use token_signer::MockTokenSigner;
