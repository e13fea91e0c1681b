use std::sync::Arc;

use bytes::Bytes;

use cubby_blob::BlobStore;
use cubby_core::{FileRecord, Identity, ShareGrant};

use crate::error::VaultError;
use crate::ledger::FileLedger;
use crate::tokens::TokenService;
use crate::users::UserDirectory;

/// The composed service core: token lifecycle, user directory, file ledger,
/// share resolution, and the blob gateway keeping blob and metadata in sync.
///
/// Construct via [`VaultBuilder`](crate::builder::VaultBuilder). All
/// operations take `&self` and are safe to call concurrently; the only
/// internal synchronization is the ledger's per-username write lock.
pub struct Vault {
    blob: Arc<dyn BlobStore>,
    tokens: TokenService,
    users: UserDirectory,
    ledger: FileLedger,
}

impl Vault {
    pub(crate) fn assemble(
        blob: Arc<dyn BlobStore>,
        tokens: TokenService,
        users: UserDirectory,
        ledger: FileLedger,
    ) -> Self {
        Self {
            blob,
            tokens,
            users,
            ledger,
        }
    }

    /// The token service, exposed for components that only mint or resolve
    /// tokens.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Claim an identity for `username` and issue a session token.
    ///
    /// Login is identity claiming, not credential verification: no password
    /// is checked. The identity is created lazily on first login and
    /// returned unchanged afterwards.
    pub async fn login(&self, username: &str) -> Result<(Identity, String), VaultError> {
        if username.is_empty() {
            return Err(VaultError::BadRequest("username must not be empty".to_owned()));
        }

        let identity = self.users.ensure_identity(username).await?;
        let token = self.tokens.issue_session(username).await?;

        tracing::info!(username, "session issued");
        Ok((identity, token))
    }

    /// Resolve a bearer token to the identity it is bound to.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, VaultError> {
        let username = self.tokens.resolve_session(token).await?;
        match self.users.lookup(&username).await? {
            Some(identity) => Ok(identity),
            // A session can outlive its identity record only if the store
            // lost the user document; treat it the same as a bad token.
            None => Err(VaultError::Unauthenticated(
                "session is bound to an unknown identity".to_owned(),
            )),
        }
    }

    /// List a user's files in upload order.
    pub async fn list_files(&self, username: &str) -> Result<Vec<FileRecord>, VaultError> {
        self.ledger.list_files(username).await
    }

    /// Store an uploaded file: blob first, then the ledger entry.
    ///
    /// If the blob write succeeds but the append fails, the blob is
    /// orphaned; that is surfaced as an error to the caller, never as
    /// success, and left for out-of-band cleanup.
    pub async fn upload(
        &self,
        username: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<FileRecord, VaultError> {
        let record = FileRecord::new(file_name, data.len() as u64);

        self.blob.put(&record.id, data).await?;

        if let Err(err) = self.ledger.append_file(username, record.clone()).await {
            tracing::error!(
                username,
                file_id = %record.id,
                error = %err,
                "ledger append failed after blob write; blob is orphaned"
            );
            return Err(err);
        }

        tracing::info!(username, file_id = %record.id, size = record.size, "file uploaded");
        Ok(record)
    }

    /// Fetch a file's record and body for a user.
    ///
    /// Missing ledger entry and missing blob both read as not-found; the
    /// two can diverge transiently and callers cannot tell which side is
    /// stale.
    pub async fn download(
        &self,
        username: &str,
        file_id: &str,
    ) -> Result<(FileRecord, Bytes), VaultError> {
        let Some(record) = self.ledger.find_file(username, file_id).await? else {
            return Err(VaultError::NotFound(format!("file not found: {file_id}")));
        };

        let Some(data) = self.blob.get(&record.id).await? else {
            return Err(VaultError::NotFound(format!("file not found: {file_id}")));
        };

        Ok((record, data))
    }

    /// Delete a file: blob first, then the ledger entry.
    ///
    /// The ordering is deliberate. If blob deletion succeeds and ledger
    /// removal then fails, the dangling metadata entry is safe: downloads
    /// report not-found. The reverse order could strand an unreachable
    /// blob.
    pub async fn delete_file(&self, username: &str, file_id: &str) -> Result<(), VaultError> {
        if self.ledger.find_file(username, file_id).await?.is_none() {
            return Err(VaultError::NotFound(format!("file not found: {file_id}")));
        }

        self.blob.delete(file_id).await?;

        let removed = self.ledger.remove_file(username, file_id).await?;
        if !removed {
            // Lost a race with another delete; the end state is what the
            // caller asked for.
            tracing::debug!(username, file_id, "ledger entry already removed");
        }

        tracing::info!(username, file_id, "file deleted");
        Ok(())
    }

    /// Create a share grant for a file the user owns and mint its token.
    ///
    /// Ledger membership is the only authorization: any owner can mint
    /// unlimited shares, each with its own independent expiry.
    pub async fn create_share(
        &self,
        username: &str,
        file_id: &str,
    ) -> Result<(String, ShareGrant), VaultError> {
        let Some(record) = self.ledger.find_file(username, file_id).await? else {
            return Err(VaultError::NotFound(format!("file not found: {file_id}")));
        };

        let grant = ShareGrant::new(username, &record, self.tokens.share_ttl());
        let token = self.tokens.issue_share(&grant).await?;

        tracing::info!(username, file_id, "share created");
        Ok((token, grant))
    }

    /// Resolve a share token and serve the file it points at.
    ///
    /// The grant does not guarantee current existence: membership in the
    /// owner's ledger and blob presence are both re-validated, so a grant
    /// that outlives its file resolves to not-found.
    pub async fn resolve_share(
        &self,
        token: &str,
    ) -> Result<(ShareGrant, FileRecord, Bytes), VaultError> {
        let grant = self.tokens.resolve_share(token).await?;

        let (record, data) = self
            .download(&grant.file_owner, &grant.file_id)
            .await
            .map_err(|err| match err {
                VaultError::NotFound(_) => {
                    VaultError::NotFound("shared file no longer exists".to_owned())
                }
                other => other,
            })?;

        Ok((grant, record, data))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cubby_blob_memory::MemoryBlobStore;
    use cubby_state_memory::MemoryStateStore;

    use crate::builder::VaultBuilder;
    use crate::tokens::{DEFAULT_SESSION_TTL, DEFAULT_SHARE_TTL};

    use super::*;

    fn vault() -> Vault {
        VaultBuilder::new()
            .state(Arc::new(MemoryStateStore::new()))
            .blob(Arc::new(MemoryBlobStore::new()))
            .build()
            .expect("vault should build")
    }

    #[tokio::test]
    async fn login_then_authenticate() {
        let vault = vault();

        let (identity, token) = vault.login("alice").await.unwrap();
        let resolved = vault.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, identity.id);
        assert_eq!(resolved.username, "alice");
    }

    #[tokio::test]
    async fn login_is_identity_claiming() {
        let vault = vault();

        // Repeat logins mint fresh tokens but keep the identity stable.
        let (first, token_a) = vault.login("alice").await.unwrap();
        let (second, token_b) = vault.login("alice").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_ne!(token_a, token_b);

        // Both sessions stay valid.
        assert!(vault.authenticate(&token_a).await.is_ok());
        assert!(vault.authenticate(&token_b).await.is_ok());
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let vault = vault();
        let err = vault.login("").await.unwrap_err();
        assert!(matches!(err, VaultError::BadRequest(_)));
    }

    #[tokio::test]
    async fn upload_list_download_round_trip() {
        let vault = vault();

        let record = vault
            .upload("alice", "note.txt", Bytes::from_static(b"ten bytes!"))
            .await
            .unwrap();
        assert_eq!(record.name, "note.txt");
        assert_eq!(record.size, 10);

        let files = vault.list_files("alice").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, record.id);

        let (found, body) = vault.download("alice", &record.id).await.unwrap();
        assert_eq!(found.name, "note.txt");
        assert_eq!(body.as_ref(), b"ten bytes!");
    }

    #[tokio::test]
    async fn download_requires_ledger_membership() {
        let vault = vault();

        let record = vault
            .upload("alice", "secret.txt", Bytes::from_static(b"hush"))
            .await
            .unwrap();

        // The blob exists, but bob's ledger has no entry for it.
        let err = vault.download("bob", &record.id).await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_blob_and_ledger_entry() {
        let vault = vault();

        let record = vault
            .upload("alice", "note.txt", Bytes::from_static(b"bye"))
            .await
            .unwrap();

        vault.delete_file("alice", &record.id).await.unwrap();

        assert!(vault.list_files("alice").await.unwrap().is_empty());
        let err = vault.download("alice", &record.id).await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_file_is_not_found() {
        let vault = vault();
        let err = vault.delete_file("alice", "no-such-id").await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn share_round_trip() {
        let vault = vault();

        let record = vault
            .upload("alice", "note.txt", Bytes::from_static(b"shared"))
            .await
            .unwrap();

        let (token, grant) = vault.create_share("alice", &record.id).await.unwrap();
        assert_eq!(grant.file_owner, "alice");
        assert_eq!(grant.file_name, "note.txt");

        let (resolved_grant, resolved_record, body) =
            vault.resolve_share(&token).await.unwrap();
        assert_eq!(resolved_grant.file_id, record.id);
        assert_eq!(resolved_record.id, record.id);
        assert_eq!(body.as_ref(), b"shared");
    }

    #[tokio::test]
    async fn share_of_unowned_file_is_not_found() {
        let vault = vault();

        let record = vault
            .upload("alice", "note.txt", Bytes::from_static(b"mine"))
            .await
            .unwrap();

        let err = vault.create_share("bob", &record.id).await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn grant_outliving_file_resolves_to_not_found() {
        let vault = vault();

        let record = vault
            .upload("alice", "note.txt", Bytes::from_static(b"gone soon"))
            .await
            .unwrap();
        let (token, _) = vault.create_share("alice", &record.id).await.unwrap();

        vault.delete_file("alice", &record.id).await.unwrap();

        // The grant is still stored, but must not serve stale bytes.
        let err = vault.resolve_share(&token).await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn session_honors_configured_ttl() {
        let vault = VaultBuilder::new()
            .state(Arc::new(MemoryStateStore::new()))
            .blob(Arc::new(MemoryBlobStore::new()))
            .session_ttl(Duration::from_secs(30))
            .build()
            .expect("vault should build");

        let (_, token) = vault.login("alice").await.unwrap();
        assert!(vault.authenticate(&token).await.is_ok());

        tokio::time::advance(Duration::from_secs(31)).await;

        let err = vault.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, VaultError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_ledger_append() {
        let vault = VaultBuilder::new()
            .state(Arc::new(MemoryStateStore::new()))
            .blob(Arc::new(MemoryBlobStore::with_max_blob_bytes(4)))
            .build()
            .expect("vault should build");

        let err = vault
            .upload("alice", "big.bin", Bytes::from_static(b"too big"))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::TooLarge { .. }));

        // The failed upload must not leave a ledger entry behind.
        assert!(vault.list_files("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn default_ttls_apply() {
        let vault = vault();
        assert_eq!(vault.tokens().session_ttl(), DEFAULT_SESSION_TTL);
        assert_eq!(vault.tokens().share_ttl(), DEFAULT_SHARE_TTL);
    }
}
