use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Pluggable blob storage backend for file bodies.
///
/// Implementors provide the actual storage mechanism (e.g. S3, GCS,
/// filesystem). Keys are assigned by the caller: Cubby uses the file
/// record's id, so blob and ledger entry can be reconciled by key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob under `key`, overwriting any previous content.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError>;

    /// Retrieve a blob by key. Returns `None` if the blob does not exist.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, BlobError>;

    /// Delete a blob by key. Returns `true` if the blob existed.
    async fn delete(&self, key: &str) -> Result<bool, BlobError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify object safety.
    fn _assert_dyn_blob_store(_: &dyn BlobStore) {}
}
