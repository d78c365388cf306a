//! Driven port for the document store holding account records.
//!
//! The store exposes exactly two capabilities against a single logical
//! collection: insert one document, and find one document matching a filter.
//! Query semantics beyond field equality belong to the adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::AccountId;

use super::define_port_error;

/// Stored representation of an account.
///
/// `id` is `None` until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDocument {
    pub id: Option<AccountId>,
    pub email: String,
    pub credential_hash: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Field-equality filter; unset fields match anything.
///
/// # Examples
/// ```
/// use idp::domain::ports::AccountFilter;
///
/// let filter = AccountFilter::by_email("a@b.com").active_only();
/// assert_eq!(filter.email.as_deref(), Some("a@b.com"));
/// assert_eq!(filter.active, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub id: Option<AccountId>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl AccountFilter {
    /// Match on identifier.
    pub fn by_id(id: AccountId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Match on email.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Restrict the filter to active documents.
    pub fn active_only(mut self) -> Self {
        self.active = Some(true);
        self
    }

    /// Whether `document` satisfies every set field.
    pub fn matches(&self, document: &AccountDocument) -> bool {
        self.id.is_none_or(|id| document.id == Some(id))
            && self
                .email
                .as_deref()
                .is_none_or(|email| document.email == email)
            && self.active.is_none_or(|active| document.active == active)
    }
}

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum AccountStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "account store connection failed: {message}",
        /// Insert or lookup failed during execution.
        Query { message: String } => "account store query failed: {message}",
    }
}

/// Capability interface over the account collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist `document` and return the identifier the store assigned.
    async fn insert_one(&self, document: &AccountDocument) -> Result<AccountId, AccountStoreError>;

    /// Return the first document matching `filter`, if any.
    async fn find_one(
        &self,
        filter: &AccountFilter,
    ) -> Result<Option<AccountDocument>, AccountStoreError>;
}
