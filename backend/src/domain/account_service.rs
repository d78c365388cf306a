//! Account creation and lookup use-cases.
//!
//! Hashes secrets before they reach the repository and translates repository
//! failures into client-facing [`Error`] values.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::account_repository::{AccountRepository, AccountRepositoryError};
use crate::domain::ports::{AccountCommand, AccountQuery, CredentialHasher};
use crate::domain::{Account, Error, ErrorReason, NewAccount};

pub(crate) const MALFORMED_ID_MESSAGE: &str = "Given hex is not a valid object ID";
pub(crate) const NOT_FOUND_MESSAGE: &str = "No resource found for the given object ID";
pub(crate) const NOT_CREATED_MESSAGE: &str = "Did not create the requested account";

/// Implements [`AccountCommand`] and [`AccountQuery`] over the repository.
#[derive(Clone)]
pub struct AccountService {
    repository: AccountRepository,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(repository: AccountRepository, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn create_account(&self, account: NewAccount) -> Result<Account, Error> {
        let hash = self.hasher.hash(account.password()).await.map_err(|err| {
            warn!(error = %err, "credential hashing failed");
            Error::internal_with(
                ErrorReason::AccountNotCreated,
                format!("{NOT_CREATED_MESSAGE}: {err}"),
            )
        })?;
        self.repository
            .create(account.email(), hash)
            .await
            .map_err(|err| {
                warn!(error = %err, "account insert failed");
                Error::internal_with(
                    ErrorReason::AccountNotCreated,
                    format!("{NOT_CREATED_MESSAGE}: {err}"),
                )
            })
    }
}

#[async_trait]
impl AccountQuery for AccountService {
    async fn find_account(&self, id: &str) -> Result<Account, Error> {
        self.repository.find_by_id(id).await.map_err(|err| match err {
            AccountRepositoryError::MalformedIdentifier { .. } => {
                debug!(account_id = id, "rejected malformed account id");
                Error::invalid_request(ErrorReason::PathParameterMalformed, MALFORMED_ID_MESSAGE)
            }
            AccountRepositoryError::NotFound => {
                Error::not_found(ErrorReason::NoMatchingResource, NOT_FOUND_MESSAGE)
            }
            AccountRepositoryError::Persistence { message } => {
                warn!(error = %message, "account lookup failed");
                Error::internal(message)
            }
        })
    }
}
