//! Fire-and-forget writer between request handlers and the store.
//!
//! Handlers hand records to a bounded channel and move on; a single writer
//! task drains the channel into the store off the async runtime. Overflow
//! and storage failures are logged and swallowed: audit history is
//! best-effort and must never affect a protocol response.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::record::UsageRecord;
use crate::store::AuditStore;

const QUEUE_CAPACITY: usize = 1024;

/// Spawner for the audit writer task.
pub struct AuditSink;

impl AuditSink {
    /// Starts the writer task and returns the shared handle.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn AuditStore>) -> AuditHandle {
        let (tx, mut rx) = mpsc::channel::<UsageRecord>(QUEUE_CAPACITY);
        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                let store = Arc::clone(&store);
                match tokio::task::spawn_blocking(move || store.append(&record)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("audit append failed: {e}"),
                    Err(e) => warn!("audit writer panicked: {e}"),
                }
            }
        });
        AuditHandle { tx }
    }
}

/// Cloneable, non-blocking producer side of the audit queue.
#[derive(Clone)]
pub struct AuditHandle {
    tx: mpsc::Sender<UsageRecord>,
}

impl AuditHandle {
    /// Enqueues a record. Never blocks; drops the record with a warning
    /// when the queue is full or the writer is gone.
    pub fn record(&self, record: UsageRecord) {
        if let Err(e) = self.tx.try_send(record) {
            warn!("audit queue unavailable, dropping record: {e}");
        }
    }
}
