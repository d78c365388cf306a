//! Process-local account store.
//!
//! Documents live in insertion order behind a mutex, so `find_one` returns the
//! earliest match. Identifiers follow the document-store object-id layout:
//! four bytes of big-endian creation seconds, five bytes fixed per store
//! instance and a three-byte wrapping counter.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{AccountDocument, AccountFilter, AccountStore, AccountStoreError};
use crate::domain::{ACCOUNT_ID_LEN, AccountId};

const COUNTER_MASK: u32 = 0x00ff_ffff;

/// In-memory implementation of [`AccountStore`].
pub struct InMemoryAccountStore {
    documents: Mutex<Vec<AccountDocument>>,
    clock: Arc<dyn Clock>,
    instance: [u8; 5],
    counter: AtomicU32,
}

impl InMemoryAccountStore {
    /// Create an empty store that timestamps identifiers from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            clock,
            instance: rand::random(),
            counter: AtomicU32::new(rand::random::<u32>() & COUNTER_MASK),
        }
    }

    fn next_id(&self) -> AccountId {
        let seconds = u32::try_from(self.clock.utc().timestamp()).unwrap_or(u32::MAX);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let mut bytes = [0_u8; ACCOUNT_ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.instance);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        AccountId::from_bytes(bytes)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<AccountDocument>>, AccountStoreError> {
        self.documents
            .lock()
            .map_err(|_| AccountStoreError::connection("account collection lock poisoned"))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert_one(&self, document: &AccountDocument) -> Result<AccountId, AccountStoreError> {
        let mut documents = self.lock()?;
        let id = match document.id {
            Some(id) if documents.iter().any(|doc| doc.id == Some(id)) => {
                return Err(AccountStoreError::query(format!(
                    "duplicate key error: _id {id} already exists"
                )));
            }
            Some(id) => id,
            None => self.next_id(),
        };
        let mut stored = document.clone();
        stored.id = Some(id);
        documents.push(stored);
        Ok(id)
    }

    async fn find_one(
        &self,
        filter: &AccountFilter,
    ) -> Result<Option<AccountDocument>, AccountStoreError> {
        let documents = self.lock()?;
        Ok(documents.iter().find(|doc| filter.matches(doc)).cloned())
    }
}
