//! Usage audit sink for licshim.
//!
//! Every accepted grant produces one [`UsageRecord`]. Records flow through
//! a bounded queue into an [`AuditStore`] so that a slow or unavailable
//! backend can never delay or fail a client response: the handle's
//! [`AuditHandle::record`] call is non-blocking and drops on overflow.
//!
//! Two store backends:
//! - [`SqliteStore`] for persistent history,
//! - [`MemoryStore`], a capped in-memory ring used when no database path
//!   is configured or the database fails to open.
//!
//! Queries (pagination, substring search, aggregate stats) are served
//! directly from the store; only the admin surface uses them.

mod error;
mod record;
mod sink;
mod store;

pub use error::{AuditError, AuditResult};
pub use record::{UsagePage, UsageRecord, UsageStats, PRODUCT_LEASE, PRODUCT_TICKET};
pub use sink::{AuditHandle, AuditSink};
pub use store::{AuditStore, MemoryStore, SqliteStore, MEMORY_STORE_CAP};
