use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use cubby_core::ShareGrant;
use cubby_state::{KeyKind, StateKey, StateStore};

use crate::error::VaultError;

/// Default session token lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default share token lifetime: 7 days.
pub const DEFAULT_SHARE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The binding stored for an issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the token is bound to.
    pub username: String,
    /// When the session stops resolving.
    pub expires_at: DateTime<Utc>,
}

/// Mints and resolves opaque session and share tokens.
///
/// Tokens are 256-bit values from the OS random source, hex-encoded, and
/// stored in the key-value collaborator under their own value with a TTL.
/// The service holds no in-process cache, so every issuance and resolution
/// is a store round trip, and expiry is enforced entirely by the store's
/// TTL mechanism. An unexpired token value is never reused: collision
/// probability at 256 bits of entropy is treated as negligible.
pub struct TokenService {
    state: Arc<dyn StateStore>,
    session_ttl: Duration,
    share_ttl: Duration,
}

impl TokenService {
    /// Create a token service over the given store.
    pub fn new(state: Arc<dyn StateStore>, session_ttl: Duration, share_ttl: Duration) -> Self {
        Self {
            state,
            session_ttl,
            share_ttl,
        }
    }

    /// The configured session token lifetime.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// The configured share token lifetime.
    #[must_use]
    pub fn share_ttl(&self) -> Duration {
        self.share_ttl
    }

    /// Issue a session token bound to `username`.
    pub async fn issue_session(&self, username: &str) -> Result<String, VaultError> {
        let token = generate_token();
        let claims = SessionClaims {
            username: username.to_owned(),
            expires_at: Utc::now() + self.session_ttl,
        };

        let key = StateKey::new(KeyKind::Session, &token);
        let value = serde_json::to_string(&claims)?;
        self.state.set(&key, &value, Some(self.session_ttl)).await?;

        Ok(token)
    }

    /// Resolve a session token to the username it is bound to.
    ///
    /// Absent and expired tokens are indistinguishable here: the store's
    /// TTL has already evicted expired bindings. Resolution does not
    /// refresh the expiry; sessions are fixed-lifetime, not sliding.
    pub async fn resolve_session(&self, token: &str) -> Result<String, VaultError> {
        let key = StateKey::new(KeyKind::Session, token);
        let Some(value) = self.state.get(&key).await? else {
            return Err(VaultError::Unauthenticated(
                "invalid or expired session token".to_owned(),
            ));
        };

        let claims: SessionClaims = serde_json::from_str(&value)?;
        Ok(claims.username)
    }

    /// Issue a share token for `grant`.
    ///
    /// Each call mints an independent token; re-sharing a file does not
    /// revoke tokens issued earlier.
    pub async fn issue_share(&self, grant: &ShareGrant) -> Result<String, VaultError> {
        let token = generate_token();

        let key = StateKey::new(KeyKind::Share, &token);
        let value = serde_json::to_string(grant)?;
        self.state.set(&key, &value, Some(self.share_ttl)).await?;

        Ok(token)
    }

    /// Resolve a share token to its grant.
    pub async fn resolve_share(&self, token: &str) -> Result<ShareGrant, VaultError> {
        let key = StateKey::new(KeyKind::Share, token);
        let Some(value) = self.state.get(&key).await? else {
            return Err(VaultError::NotFound(
                "share not found or expired".to_owned(),
            ));
        };

        let grant: ShareGrant = serde_json::from_str(&value)?;
        Ok(grant)
    }
}

/// Generate an opaque token from 256 bits of OS randomness, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
