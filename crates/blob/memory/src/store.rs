use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use cubby_blob::error::BlobError;
use cubby_blob::store::BlobStore;

/// In-memory [`BlobStore`] backed by a [`DashMap`].
///
/// Reference backend for development and tests. An optional per-blob size
/// cap rejects oversized bodies before they are stored.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    data: DashMap<String, Bytes>,
    max_blob_bytes: Option<u64>,
}

impl MemoryBlobStore {
    /// Create a new, empty in-memory blob store with no size cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects blobs larger than `limit` bytes.
    #[must_use]
    pub fn with_max_blob_bytes(limit: u64) -> Self {
        Self {
            data: DashMap::new(),
            max_blob_bytes: Some(limit),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError> {
        if let Some(limit) = self.max_blob_bytes {
            let size = data.len() as u64;
            if size > limit {
                return Err(BlobError::TooLarge { size, limit });
            }
        }

        self.data.insert(key.to_owned(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, BlobError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, BlobError> {
        Ok(self.data.remove(key).is_some())
    }
}
