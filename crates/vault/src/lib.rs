pub mod builder;
pub mod error;
pub mod ledger;
pub mod tokens;
pub mod users;
pub mod vault;

pub use builder::VaultBuilder;
pub use error::VaultError;
pub use ledger::FileLedger;
pub use tokens::{DEFAULT_SESSION_TTL, DEFAULT_SHARE_TTL, SessionClaims, TokenService};
pub use users::UserDirectory;
pub use vault::Vault;
