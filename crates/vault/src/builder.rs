use std::sync::Arc;
use std::time::Duration;

use cubby_blob::BlobStore;
use cubby_state::StateStore;

use crate::error::VaultError;
use crate::ledger::FileLedger;
use crate::tokens::{DEFAULT_SESSION_TTL, DEFAULT_SHARE_TTL, TokenService};
use crate::users::UserDirectory;
use crate::vault::Vault;

/// Fluent builder for constructing a [`Vault`] instance.
///
/// A [`StateStore`] and [`BlobStore`] implementation must be supplied;
/// token lifetimes default to 24 hours (sessions) and 7 days (shares).
pub struct VaultBuilder {
    state: Option<Arc<dyn StateStore>>,
    blob: Option<Arc<dyn BlobStore>>,
    session_ttl: Duration,
    share_ttl: Duration,
}

impl VaultBuilder {
    /// Create a new builder with default token lifetimes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: None,
            blob: None,
            session_ttl: DEFAULT_SESSION_TTL,
            share_ttl: DEFAULT_SHARE_TTL,
        }
    }

    /// Set the key-value store implementation.
    #[must_use]
    pub fn state(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state = Some(store);
        self
    }

    /// Set the blob store implementation.
    #[must_use]
    pub fn blob(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob = Some(store);
        self
    }

    /// Set the session token lifetime.
    #[must_use]
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the share token lifetime.
    #[must_use]
    pub fn share_ttl(mut self, ttl: Duration) -> Self {
        self.share_ttl = ttl;
        self
    }

    /// Build the vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if either store is missing.
    pub fn build(self) -> Result<Vault, VaultError> {
        let state = self
            .state
            .ok_or_else(|| VaultError::Configuration("a state store is required".to_owned()))?;
        let blob = self
            .blob
            .ok_or_else(|| VaultError::Configuration("a blob store is required".to_owned()))?;

        let tokens = TokenService::new(Arc::clone(&state), self.session_ttl, self.share_ttl);
        let users = UserDirectory::new(Arc::clone(&state));
        let ledger = FileLedger::new(state);

        Ok(Vault::assemble(blob, tokens, users, ledger))
    }
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self::new()
    }
}
