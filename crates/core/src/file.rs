use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored file.
///
/// A record belongs to exactly one user's ledger, which is an ordered
/// sequence preserving upload order. Record ids are unique within a ledger
/// and double as the blob store key for the file body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FileRecord {
    /// Unique file identifier; also the blob store key.
    pub id: String,

    /// Original filename as uploaded.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,

    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record for a newly uploaded file with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            size,
            uploaded_at: now,
            updated_at: now,
        }
    }
}
