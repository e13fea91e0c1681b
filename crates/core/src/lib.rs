pub mod file;
pub mod identity;
pub mod share;

pub use file::FileRecord;
pub use identity::Identity;
pub use share::ShareGrant;
