//! Usage records and query result shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product tag for lease-protocol grants.
pub const PRODUCT_LEASE: &str = "lease-protocol-A";

/// Product tag for ticket-protocol grants.
pub const PRODUCT_TICKET: &str = "ticket-protocol-A";

/// One accepted grant. Created on issue, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// When the grant was issued (UTC).
    pub timestamp: DateTime<Utc>,
    /// Which protocol issued it ([`PRODUCT_LEASE`] or [`PRODUCT_TICKET`]).
    pub product: String,
    /// Operation that produced the record, e.g. `lease` or `obtainTicket`.
    pub action: String,
    /// Client installation id; the lease protocol supplies a guid, the
    /// ticket protocol has none.
    pub client_id: Option<String>,
    /// Username, when the operation carries one.
    pub username: Option<String>,
    /// Client IP as resolved from forwarding headers or the socket peer.
    pub ip: String,
    /// Client user agent, truncated by the caller.
    pub user_agent: String,
}

impl UsageRecord {
    /// A record stamped with the current time.
    #[must_use]
    pub fn now(product: &str, action: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            product: product.to_string(),
            action: action.to_string(),
            client_id: None,
            username: None,
            ip: String::new(),
            user_agent: String::new(),
        }
    }

    fn field_matches(field: Option<&str>, needle: &str) -> bool {
        field.is_some_and(|v| v.to_lowercase().contains(needle))
    }

    /// Case-insensitive substring match over client id, ip, and username.
    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        Self::field_matches(self.client_id.as_deref(), &needle)
            || Self::field_matches(Some(&self.ip), &needle)
            || Self::field_matches(self.username.as_deref(), &needle)
    }
}

/// One page of query results, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsagePage {
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
    pub records: Vec<UsageRecord>,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total: u64,
    pub today: u64,
    pub lease: u64,
    pub ticket: u64,
}
