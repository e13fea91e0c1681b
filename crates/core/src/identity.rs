use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stable identity record for a username.
///
/// Created once per username on first login and never mutated or deleted.
/// The username is used verbatim as the partition key for the identity,
/// ledger, and share records: no case folding or normalization is applied.
/// That is a fixed policy, not an oversight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Identity {
    /// Unique identity identifier.
    pub id: String,

    /// The claimed username, stored verbatim.
    pub username: String,

    /// Timestamp of first login.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Create a fresh identity for a username with a generated id.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}
