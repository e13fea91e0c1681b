use std::time::Duration;

use crate::error::StateError;
use crate::key::{KeyKind, StateKey};
use crate::store::StateStore;

fn test_key(kind: KeyKind, id: &str) -> StateKey {
    StateKey::new(kind, id)
}

/// Run the full state store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn StateStore) -> Result<(), StateError> {
    test_get_missing(store).await?;
    test_set_and_get(store).await?;
    test_overwrite(store).await?;
    test_delete(store).await?;
    test_ttl_set(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn StateStore) -> Result<(), StateError> {
    let key = test_key(KeyKind::User, "missing");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get on missing key should return None");
    Ok(())
}

async fn test_set_and_get(store: &dyn StateStore) -> Result<(), StateError> {
    let key = test_key(KeyKind::User, "set-get");
    store.set(&key, "hello", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("hello"));
    Ok(())
}

async fn test_overwrite(store: &dyn StateStore) -> Result<(), StateError> {
    let key = test_key(KeyKind::Ledger, "overwrite");
    store.set(&key, "v1", None).await?;
    store.set(&key, "v2", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("v2"), "set should be last-writer-wins");
    Ok(())
}

async fn test_delete(store: &dyn StateStore) -> Result<(), StateError> {
    let key = test_key(KeyKind::Session, "to-delete");
    store.set(&key, "bye", None).await?;
    let existed = store.delete(&key).await?;
    assert!(existed, "delete should return true for existing key");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get after delete should return None");

    let existed = store.delete(&key).await?;
    assert!(!existed, "delete on missing key should return false");
    Ok(())
}

async fn test_ttl_set(store: &dyn StateStore) -> Result<(), StateError> {
    // Only checks that a TTL'd value is immediately readable; expiry timing
    // is backend-specific and covered by backend-local tests.
    let key = test_key(KeyKind::Share, "ttl-set");
    store
        .set(&key, "short-lived", Some(Duration::from_secs(60)))
        .await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("short-lived"));
    Ok(())
}
