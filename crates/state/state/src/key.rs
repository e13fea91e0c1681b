use serde::{Deserialize, Serialize};

/// The kind of record being stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// Identity record, keyed by username.
    User,
    /// Session token binding, keyed by token value.
    Session,
    /// Per-user file ledger document, keyed by username.
    Ledger,
    /// Share grant, keyed by share token value.
    Share,
    Custom(String),
}

impl KeyKind {
    /// Return a string representation of the key kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Session => "session",
            Self::Ledger => "ledger",
            Self::Share => "share",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to address records in the store.
///
/// The `id` is the partition value for the kind: a verbatim username for
/// `User` and `Ledger`, a token value for `Session` and `Share`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub kind: KeyKind,
    pub id: String,
}

impl StateKey {
    /// Create a new state key.
    #[must_use]
    pub fn new(kind: KeyKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Return a canonical string representation: `kind:id`
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
