//! Audit store backends.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::AuditResult;
use crate::record::{UsagePage, UsageRecord, UsageStats, PRODUCT_LEASE, PRODUCT_TICKET};

/// Maximum records the in-memory fallback retains (newest win).
pub const MEMORY_STORE_CAP: usize = 10_000;

/// Append/query contract consumed by the sink and the admin surface.
///
/// `append` must be safe under concurrent calls; both backends serialize
/// internally. `page` is 1-based; `search` is a case-insensitive substring
/// match over client id, ip, and username.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: &UsageRecord) -> AuditResult<()>;
    fn query(&self, page: usize, page_size: usize, search: Option<&str>) -> AuditResult<UsagePage>;
    fn stats(&self) -> AuditResult<UsageStats>;
}

// ── In-memory fallback ───────────────────────────────────────────

/// Capped newest-first ring, used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<VecDeque<UsageRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for MemoryStore {
    fn append(&self, record: &UsageRecord) -> AuditResult<()> {
        let mut records = self.records.lock().unwrap();
        records.push_front(record.clone());
        records.truncate(MEMORY_STORE_CAP);
        Ok(())
    }

    fn query(&self, page: usize, page_size: usize, search: Option<&str>) -> AuditResult<UsagePage> {
        let records = self.records.lock().unwrap();
        let matching: Vec<&UsageRecord> = match search {
            Some(s) if !s.is_empty() => records.iter().filter(|r| r.matches(s)).collect(),
            _ => records.iter().collect(),
        };

        let total = matching.len() as u64;
        let page = page.max(1);
        let offset = (page - 1) * page_size;
        let records = matching
            .into_iter()
            .skip(offset)
            .take(page_size)
            .cloned()
            .collect();

        Ok(UsagePage {
            total,
            page,
            page_size,
            records,
        })
    }

    fn stats(&self) -> AuditResult<UsageStats> {
        let records = self.records.lock().unwrap();
        let today = Utc::now().date_naive();
        Ok(UsageStats {
            total: records.len() as u64,
            today: records
                .iter()
                .filter(|r| r.timestamp.date_naive() == today)
                .count() as u64,
            lease: records.iter().filter(|r| r.product == PRODUCT_LEASE).count() as u64,
            ticket: records.iter().filter(|r| r.product == PRODUCT_TICKET).count() as u64,
        })
    }
}

// ── SQLite backend ───────────────────────────────────────────────

/// Persistent store backed by SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or the schema
    /// cannot be created; the caller falls back to [`MemoryStore`].
    pub fn open(path: &Path) -> AuditResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> AuditResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AuditResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> AuditResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS usage_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                product TEXT NOT NULL,
                action TEXT NOT NULL,
                client_id TEXT,
                username TEXT,
                ip TEXT NOT NULL,
                user_agent TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_usage_timestamp ON usage_records (timestamp);
            CREATE INDEX IF NOT EXISTS idx_usage_product ON usage_records (product);
            CREATE INDEX IF NOT EXISTS idx_usage_client_id ON usage_records (client_id);
            CREATE INDEX IF NOT EXISTS idx_usage_ip ON usage_records (ip);
            ",
        )?;
        Ok(())
    }
}

impl AuditStore for SqliteStore {
    fn append(&self, record: &UsageRecord) -> AuditResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO usage_records (timestamp, product, action, client_id, username, ip, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.timestamp.to_rfc3339(),
                record.product,
                record.action,
                record.client_id,
                record.username,
                record.ip,
                record.user_agent,
            ],
        )?;
        Ok(())
    }

    fn query(&self, page: usize, page_size: usize, search: Option<&str>) -> AuditResult<UsagePage> {
        let conn = self.conn.lock().unwrap();
        let page = page.max(1);
        let offset = (page - 1) * page_size;

        let pattern = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let (total, rows): (u64, Vec<UsageRecord>) = match &pattern {
            Some(p) => {
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM usage_records
                     WHERE client_id LIKE ?1 OR ip LIKE ?1 OR username LIKE ?1",
                    params![p],
                    |row| row.get(0),
                )?;
                let mut stmt = conn.prepare(
                    "SELECT timestamp, product, action, client_id, username, ip, user_agent
                     FROM usage_records
                     WHERE client_id LIKE ?1 OR ip LIKE ?1 OR username LIKE ?1
                     ORDER BY id DESC LIMIT ?2 OFFSET ?3",
                )?;
                let rows = stmt
                    .query_map(params![p, page_size as i64, offset as i64], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                (total as u64, rows)
            }
            None => {
                let total: i64 =
                    conn.query_row("SELECT COUNT(*) FROM usage_records", [], |row| row.get(0))?;
                let mut stmt = conn.prepare(
                    "SELECT timestamp, product, action, client_id, username, ip, user_agent
                     FROM usage_records ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                )?;
                let rows = stmt
                    .query_map(params![page_size as i64, offset as i64], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                (total as u64, rows)
            }
        };

        Ok(UsagePage {
            total,
            page,
            page_size,
            records: rows,
        })
    }

    fn stats(&self) -> AuditResult<UsageStats> {
        let conn = self.conn.lock().unwrap();
        let count = |sql: &str, args: &[&dyn rusqlite::ToSql]| -> AuditResult<u64> {
            let n: i64 = conn.query_row(sql, args, |row| row.get(0))?;
            Ok(n as u64)
        };

        // RFC 3339 timestamps sort and prefix-match by date.
        let today_prefix = format!("{}%", Utc::now().format("%Y-%m-%d"));
        Ok(UsageStats {
            total: count("SELECT COUNT(*) FROM usage_records", &[])?,
            today: count(
                "SELECT COUNT(*) FROM usage_records WHERE timestamp LIKE ?1",
                &[&today_prefix],
            )?,
            lease: count(
                "SELECT COUNT(*) FROM usage_records WHERE product = ?1",
                &[&PRODUCT_LEASE],
            )?,
            ticket: count(
                "SELECT COUNT(*) FROM usage_records WHERE product = ?1",
                &[&PRODUCT_TICKET],
            )?,
        })
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<UsageRecord> {
    let ts: String = row.get(0)?;
    let timestamp = DateTime::parse_from_rfc3339(&ts)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH);
    Ok(UsageRecord {
        timestamp,
        product: row.get(1)?,
        action: row.get(2)?,
        client_id: row.get(3)?,
        username: row.get(4)?,
        ip: row.get(5)?,
        user_agent: row.get(6)?,
    })
}
