use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use cubby_core::FileRecord;
use cubby_state::{KeyKind, StateKey, StateStore};

use crate::error::VaultError;

/// The authoritative per-user ordered list of file metadata.
///
/// Each user's ledger is one JSON document in the key-value store, keyed by
/// username. The store offers no conditional write, so every mutation is a
/// read-modify-write of the whole document. A per-username async mutex
/// serializes those cycles within this process; across horizontally scaled
/// instances the document is last-writer-wins and a concurrent mutation can
/// be lost. That residual race is an accepted limitation of the assumed
/// store, not something this layer hides.
pub struct FileLedger {
    state: Arc<dyn StateStore>,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FileLedger {
    /// Create a ledger over the given store.
    pub fn new(state: Arc<dyn StateStore>) -> Self {
        Self {
            state,
            write_locks: DashMap::new(),
        }
    }

    /// The in-process write lock for one username's document.
    fn write_lock(&self, username: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(username.to_owned())
            .or_default()
            .clone()
    }

    async fn read_document(&self, username: &str) -> Result<Vec<FileRecord>, VaultError> {
        let key = StateKey::new(KeyKind::Ledger, username);
        match self.state.get(&key).await? {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_document(
        &self,
        username: &str,
        records: &[FileRecord],
    ) -> Result<(), VaultError> {
        let key = StateKey::new(KeyKind::Ledger, username);
        let value = serde_json::to_string(records)?;
        self.state.set(&key, &value, None).await?;
        Ok(())
    }

    /// List a user's files in upload order.
    ///
    /// A user who has never uploaded has no document; that reads as empty.
    pub async fn list_files(&self, username: &str) -> Result<Vec<FileRecord>, VaultError> {
        self.read_document(username).await
    }

    /// Find one record in a user's ledger by file id.
    pub async fn find_file(
        &self,
        username: &str,
        file_id: &str,
    ) -> Result<Option<FileRecord>, VaultError> {
        let records = self.read_document(username).await?;
        Ok(records.into_iter().find(|r| r.id == file_id))
    }

    /// Append a record to a user's ledger, preserving upload order.
    pub async fn append_file(
        &self,
        username: &str,
        record: FileRecord,
    ) -> Result<(), VaultError> {
        let lock = self.write_lock(username);
        let _guard = lock.lock().await;

        let mut records = self.read_document(username).await?;
        records.push(record);
        self.write_document(username, &records).await
    }

    /// Remove a record by file id. Returns `false` if the id is absent.
    pub async fn remove_file(&self, username: &str, file_id: &str) -> Result<bool, VaultError> {
        let lock = self.write_lock(username);
        let _guard = lock.lock().await;

        let mut records = self.read_document(username).await?;
        let Some(index) = records.iter().position(|r| r.id == file_id) else {
            return Ok(false);
        };

        records.remove(index);
        self.write_document(username, &records).await?;
        Ok(true)
    }
}
