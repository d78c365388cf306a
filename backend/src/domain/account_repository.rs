//! Account repository over the document store port.
//!
//! Maps the domain operations (create, find by id, find by email) onto
//! [`AccountStore`] and owns the lifecycle stamping: new accounts are active
//! and carry repository-assigned `created`/`modified` timestamps.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    AccountDocument, AccountFilter, AccountStore, AccountStoreError, define_port_error,
};
use crate::domain::{Account, AccountId, CredentialHash};

define_port_error! {
    /// Failures surfaced by [`AccountRepository`].
    pub enum AccountRepositoryError {
        /// The identifier does not decode into the store's id format.
        MalformedIdentifier { id: String } => "account identifier is malformed: {id}",
        /// No account matched; for id lookups this includes inactive accounts.
        NotFound => "no matching account",
        /// The store failed; the account must not be assumed to exist.
        Persistence { message: String } => "{message}",
    }
}

impl From<AccountStoreError> for AccountRepositoryError {
    fn from(value: AccountStoreError) -> Self {
        Self::persistence(value.to_string())
    }
}

/// Domain account repository.
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl AccountRepository {
    /// Create a repository over `store`, stamping times from `clock`.
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persist a new active account and return it with its store-assigned id.
    pub async fn create(
        &self,
        email: &str,
        credential_hash: CredentialHash,
    ) -> Result<Account, AccountRepositoryError> {
        let now = self.clock.utc();
        let mut document = AccountDocument {
            id: None,
            email: email.to_owned(),
            credential_hash: credential_hash.as_str().to_owned(),
            active: true,
            created: now,
            modified: now,
        };
        let id = self.store.insert_one(&document).await?;
        debug!(account_id = %id, "account document inserted");
        document.id = Some(id);
        Ok(into_account(id, document))
    }

    /// Look up an active account by hex identifier.
    pub async fn find_by_id(&self, raw_id: &str) -> Result<Account, AccountRepositoryError> {
        let id = AccountId::parse_hex(raw_id)
            .map_err(|_| AccountRepositoryError::malformed_identifier(raw_id))?;
        let filter = AccountFilter::by_id(id).active_only();
        let document = self
            .store
            .find_one(&filter)
            .await?
            .ok_or(AccountRepositoryError::NotFound)?;
        Ok(into_account(id, document))
    }

    /// Look up an account by email.
    ///
    /// Uniqueness is not enforced here; with duplicates the store's first
    /// match wins.
    pub async fn find_by_email(&self, email: &str) -> Result<Account, AccountRepositoryError> {
        let document = self
            .store
            .find_one(&AccountFilter::by_email(email))
            .await?
            .ok_or(AccountRepositoryError::NotFound)?;
        let id = document.id.ok_or_else(|| {
            AccountRepositoryError::persistence("stored account document has no identifier")
        })?;
        Ok(into_account(id, document))
    }
}

fn into_account(id: AccountId, document: AccountDocument) -> Account {
    Account {
        id,
        email: document.email,
        credential_hash: CredentialHash::new(document.credential_hash),
        active: document.active,
        created: document.created,
        modified: document.modified,
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the repository against a mocked store.
    use super::*;
    use crate::domain::ports::MockAccountStore;
    use crate::test_support::{MutableClock, fixture_timestamp};
    use mockall::predicate::eq;
    use rstest::rstest;

    const ID_HEX: &str = "65f1a2b3c4d5e6f708192a3b";

    fn repository(store: MockAccountStore) -> AccountRepository {
        AccountRepository::new(Arc::new(store), Arc::new(MutableClock::default()))
    }

    fn stored(active: bool) -> AccountDocument {
        AccountDocument {
            id: Some(AccountId::parse_hex(ID_HEX).expect("valid id")),
            email: "test@example.com".to_owned(),
            credential_hash: "$argon2id$stub".to_owned(),
            active,
            created: fixture_timestamp(),
            modified: fixture_timestamp(),
        }
    }

    #[tokio::test]
    async fn create_stamps_lifecycle_fields_and_assigns_id() {
        let assigned = AccountId::parse_hex(ID_HEX).expect("valid id");
        let mut store = MockAccountStore::new();
        store
            .expect_insert_one()
            .withf(|doc| {
                doc.id.is_none()
                    && doc.active
                    && doc.email == "test@example.io"
                    && doc.created == fixture_timestamp()
                    && doc.modified == fixture_timestamp()
            })
            .times(1)
            .returning(move |_| Ok(assigned));

        let account = repository(store)
            .create("test@example.io", CredentialHash::new("$argon2id$stub"))
            .await
            .expect("create succeeds");

        assert_eq!(account.id, assigned);
        assert!(account.active);
        assert_eq!(account.created, account.modified);
    }

    #[tokio::test]
    async fn create_reports_store_failures_as_persistence_errors() {
        let mut store = MockAccountStore::new();
        store
            .expect_insert_one()
            .returning(|_| Err(AccountStoreError::query("duplicate write")));

        let err = repository(store)
            .create("test@example.io", CredentialHash::new("h"))
            .await
            .expect_err("store failure");

        assert_eq!(
            err,
            AccountRepositoryError::persistence("account store query failed: duplicate write")
        );
    }

    #[tokio::test]
    async fn find_by_id_filters_on_id_and_active_flag() {
        let id = AccountId::parse_hex(ID_HEX).expect("valid id");
        let mut store = MockAccountStore::new();
        store
            .expect_find_one()
            .with(eq(AccountFilter::by_id(id).active_only()))
            .times(1)
            .returning(|_| Ok(Some(stored(true))));

        let account = repository(store)
            .find_by_id(ID_HEX)
            .await
            .expect("account found");

        assert_eq!(account.id, id);
        assert_eq!(account.email, "test@example.com");
    }

    #[tokio::test]
    async fn find_by_id_reports_not_found_when_no_active_document_matches() {
        let mut store = MockAccountStore::new();
        store.expect_find_one().returning(|_| Ok(None));

        let err = repository(store)
            .find_by_id(ID_HEX)
            .await
            .expect_err("missing account");

        assert_eq!(err, AccountRepositoryError::NotFound);
    }

    #[rstest]
    #[case("not-a-hex")]
    #[case("")]
    #[case("65f1a2b3c4d5e6f708192a3bff")]
    #[tokio::test]
    async fn find_by_id_rejects_malformed_identifiers_without_store_access(#[case] raw: &str) {
        let mut store = MockAccountStore::new();
        store.expect_find_one().times(0);

        let err = repository(store)
            .find_by_id(raw)
            .await
            .expect_err("malformed id");

        assert_eq!(err, AccountRepositoryError::malformed_identifier(raw));
    }

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_one()
            .with(eq(AccountFilter::by_email("test@example.com")))
            .returning(|_| Ok(Some(stored(true))));

        let account = repository(store)
            .find_by_email("test@example.com")
            .await
            .expect("account found");

        assert_eq!(account.credential_hash.as_str(), "$argon2id$stub");
    }

    #[tokio::test]
    async fn find_by_email_reports_not_found() {
        let mut store = MockAccountStore::new();
        store.expect_find_one().returning(|_| Ok(None));

        let err = repository(store)
            .find_by_email("nobody@example.com")
            .await
            .expect_err("missing account");

        assert_eq!(err, AccountRepositoryError::NotFound);
    }
}
