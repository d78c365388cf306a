//! Driving ports for account creation and lookup.

use async_trait::async_trait;

use crate::domain::{Account, Error, NewAccount};

/// Create accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Hash the secret, persist the account and return it with its assigned id.
    async fn create_account(&self, account: NewAccount) -> Result<Account, Error>;
}

/// Read accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Look up an active account by the hex identifier taken from the request.
    async fn find_account(&self, id: &str) -> Result<Account, Error>;
}
