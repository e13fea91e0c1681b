use std::time::Duration;

use async_trait::async_trait;

use crate::error::StateError;
use crate::key::StateKey;

/// Trait for the key-value collaborator holding Cubby's metadata.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// The contract is deliberately narrow: get, overwrite-with-optional-TTL,
/// and delete. There is no conditional write or atomic append, so callers
/// performing read-modify-write cycles (the file ledger) must bring their
/// own serialization and accept last-writer-wins across processes.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the value for a key. Returns `None` if not found or expired.
    async fn get(&self, key: &StateKey) -> Result<Option<String>, StateError>;

    /// Set a value with an optional TTL, overwriting any previous value.
    async fn set(
        &self,
        key: &StateKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StateError>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &StateKey) -> Result<bool, StateError>;
}
