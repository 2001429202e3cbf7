//! The identity store seam and its in-memory implementation.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::wallet::types::{validate_label, CredentialRecord, WalletError, WalletResult};

/// Durable, keyed store of credential records.
///
/// `put` must be conditional: when two writers race on one label exactly one
/// succeeds and the other gets [`WalletError::AlreadyExists`].
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Whether a record is stored under `label`.
    async fn exists(&self, label: &str) -> WalletResult<bool>;

    /// Fetch the record stored under `label`.
    async fn get(&self, label: &str) -> WalletResult<CredentialRecord>;

    /// Store `record` under `record.label` unless the label is taken.
    async fn put(&self, record: CredentialRecord) -> WalletResult<()>;

    /// All stored labels, sorted.
    async fn list(&self) -> WalletResult<Vec<String>>;
}

/// Process-local identity store, mainly for tests and embedding.
#[derive(Clone, Default)]
pub struct InMemoryWallet {
    entries: Arc<DashMap<String, CredentialRecord>>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryWallet {
    async fn exists(&self, label: &str) -> WalletResult<bool> {
        Ok(self.entries.contains_key(label))
    }

    async fn get(&self, label: &str) -> WalletResult<CredentialRecord> {
        self.entries
            .get(label)
            .map(|r| r.value().clone())
            .ok_or_else(|| WalletError::NotFound(label.to_string()))
    }

    async fn put(&self, record: CredentialRecord) -> WalletResult<()> {
        validate_label(&record.label)?;
        match self.entries.entry(record.label.clone()) {
            Entry::Occupied(_) => Err(WalletError::AlreadyExists(record.label)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn list(&self) -> WalletResult<Vec<String>> {
        let mut labels: Vec<String> = self.entries.iter().map(|r| r.key().clone()).collect();
        labels.sort();
        Ok(labels)
    }
}
