use std::sync::Arc;

use cubby_core::Identity;
use cubby_state::{KeyKind, StateKey, StateStore};

use crate::error::VaultError;

/// Maps usernames to stable identity records, created lazily on first login.
///
/// The username is used verbatim as the store key: `"Alice"` and `"alice"`
/// are distinct identities by policy. Identities are never mutated or
/// deleted.
pub struct UserDirectory {
    state: Arc<dyn StateStore>,
}

impl UserDirectory {
    /// Create a directory over the given store.
    pub fn new(state: Arc<dyn StateStore>) -> Self {
        Self { state }
    }

    /// Look up the identity for a username, if one has been created.
    pub async fn lookup(&self, username: &str) -> Result<Option<Identity>, VaultError> {
        let key = StateKey::new(KeyKind::User, username);
        match self.state.get(&key).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Return the identity for a username, creating it on first sight.
    ///
    /// Idempotent: a previously created identity is returned unchanged.
    /// Two concurrent first logins for the same username can both create a
    /// record; the store keeps the last write and subsequent calls agree on
    /// it.
    pub async fn ensure_identity(&self, username: &str) -> Result<Identity, VaultError> {
        if let Some(existing) = self.lookup(username).await? {
            return Ok(existing);
        }

        let identity = Identity::new(username);
        let key = StateKey::new(KeyKind::User, username);
        let value = serde_json::to_string(&identity)?;
        self.state.set(&key, &value, None).await?;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use cubby_state_memory::MemoryStateStore;

    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(MemoryStateStore::new()))
    }

    #[tokio::test]
    async fn ensure_identity_is_idempotent() {
        let users = directory();

        let first = users.ensure_identity("alice").await.unwrap();
        let second = users.ensure_identity("alice").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn lookup_missing_returns_none() {
        let users = directory();
        assert!(users.lookup("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let users = directory();

        let lower = users.ensure_identity("alice").await.unwrap();
        let upper = users.ensure_identity("Alice").await.unwrap();
        assert_ne!(lower.id, upper.id);
    }
}
