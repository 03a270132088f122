use std::sync::Arc;
use std::time::Duration;

use licshim_audit::{AuditSink, AuditStore, MemoryStore, UsageRecord, PRODUCT_LEASE};

/// Polls the store until `total` records are visible or the deadline passes.
async fn wait_for_total(store: &Arc<MemoryStore>, total: u64) {
    for _ in 0..100 {
        if store.query(1, 1, None).unwrap().total >= total {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "store never reached {total} records (got {})",
        store.query(1, 1, None).unwrap().total
    );
}

#[tokio::test]
async fn recorded_entries_reach_the_store() {
    let store = Arc::new(MemoryStore::new());
    let handle = AuditSink::spawn(store.clone() as Arc<dyn AuditStore>);

    handle.record(UsageRecord::now(PRODUCT_LEASE, "lease"));
    wait_for_total(&store, 1).await;
}

#[tokio::test]
async fn handle_is_cloneable_and_concurrent() {
    let store = Arc::new(MemoryStore::new());
    let handle = AuditSink::spawn(store.clone() as Arc<dyn AuditStore>);

    let mut tasks = Vec::new();
    for i in 0..50 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move {
            let mut rec = UsageRecord::now(PRODUCT_LEASE, "lease");
            rec.client_id = Some(format!("guid-{i}"));
            h.record(rec);
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    wait_for_total(&store, 50).await;
}

#[tokio::test]
async fn record_never_blocks_the_caller() {
    let store = Arc::new(MemoryStore::new());
    let handle = AuditSink::spawn(store.clone() as Arc<dyn AuditStore>);

    // A burst far beyond anything a single writer could drain synchronously;
    // every call must return immediately.
    let start = std::time::Instant::now();
    for i in 0..500 {
        let mut rec = UsageRecord::now(PRODUCT_LEASE, "lease");
        rec.client_id = Some(format!("burst-{i}"));
        handle.record(rec);
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}
