use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file::FileRecord;

/// The record backing a public share token.
///
/// The token value itself is the store key; the grant carries everything
/// needed to resolve the share back to a file. A grant is independent of
/// the file's lifetime: it may transiently outlive the file it points at,
/// in which case resolution reports not-found rather than serving stale
/// bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShareGrant {
    /// Id of the shared file.
    pub file_id: String,

    /// Username owning the file's ledger.
    pub file_owner: String,

    /// Filename at share time, used for the download disposition.
    pub file_name: String,

    /// When the share was created.
    pub shared_at: DateTime<Utc>,

    /// When the share stops resolving.
    pub expires_at: DateTime<Utc>,
}

impl ShareGrant {
    /// Create a grant for a file owned by `owner`, expiring after `ttl`.
    #[must_use]
    pub fn new(owner: impl Into<String>, record: &FileRecord, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            file_id: record.id.clone(),
            file_owner: owner.into(),
            file_name: record.name.clone(),
            shared_at: now,
            expires_at: now + ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_expiry_offset() {
        let record = FileRecord::new("report.pdf", 2048);
        let grant = ShareGrant::new("alice", &record, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(grant.expires_at - grant.shared_at, chrono::TimeDelta::days(7));
        assert_eq!(grant.file_id, record.id);
        assert_eq!(grant.file_name, "report.pdf");
    }
}
