//! Error types for the audit store.

use thiserror::Error;

/// Audit persistence errors. Never surfaced to protocol clients; the sink
/// logs and swallows them.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The SQLite backend failed.
    #[error("audit storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
