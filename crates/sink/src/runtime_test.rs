//! Tests for the shared runtime index

use super::*;

fn cfg(addr: &str, max_sessions: usize) -> SinkConfig {
    SinkConfig {
        http_addr: addr.into(),
        max_concurrent_sessions: max_sessions,
        ..SinkConfig::default()
    }
}

#[tokio::test]
async fn test_acquire_shares_runtime_per_address() {
    let index = RuntimeIndex::new();

    let first = index.acquire(&cfg(":18080", 4));
    let second = index.acquire(&cfg(":18080", 4));
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(first.registry(), second.registry()));
    assert_eq!(index.len(), 1);

    let other = index.acquire(&cfg(":18081", 4));
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_acquire_widens_session_cap() {
    let index = RuntimeIndex::new();

    let runtime = index.acquire(&cfg(":18080", 4));
    assert_eq!(runtime.registry().max_sessions(), 4);

    index.acquire(&cfg(":18080", 32));
    assert_eq!(runtime.registry().max_sessions(), 32);

    // A lower request never shrinks the cap.
    index.acquire(&cfg(":18080", 8));
    assert_eq!(runtime.registry().max_sessions(), 32);
}

#[tokio::test]
async fn test_last_release_removes_runtime() {
    let index = RuntimeIndex::new();

    let first = index.acquire(&cfg(":18080", 4));
    let second = index.acquire(&cfg(":18080", 4));
    assert_eq!(index.len(), 1);

    first.release(&index, CancellationToken::new()).await;
    assert_eq!(index.len(), 1, "runtime must survive while referenced");

    second.release(&index, CancellationToken::new()).await;
    assert!(index.is_empty());

    // A fresh acquire after teardown builds a new runtime.
    let fresh = index.acquire(&cfg(":18080", 4));
    assert!(!Arc::ptr_eq(&first, &fresh));
}
