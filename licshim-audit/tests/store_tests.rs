use chrono::{Duration, Utc};
use licshim_audit::{
    AuditStore, MemoryStore, SqliteStore, UsageRecord, MEMORY_STORE_CAP, PRODUCT_LEASE,
    PRODUCT_TICKET,
};
use pretty_assertions::assert_eq;

fn lease_record(guid: &str, username: &str, ip: &str) -> UsageRecord {
    UsageRecord {
        client_id: Some(guid.to_string()),
        username: Some(username.to_string()),
        ip: ip.to_string(),
        user_agent: "test-agent/1.0".to_string(),
        ..UsageRecord::now(PRODUCT_LEASE, "lease")
    }
}

fn ticket_record(username: &str) -> UsageRecord {
    UsageRecord {
        username: Some(username.to_string()),
        ip: "10.0.0.9".to_string(),
        ..UsageRecord::now(PRODUCT_TICKET, "obtainTicket")
    }
}

fn stores() -> Vec<Box<dyn AuditStore>> {
    vec![
        Box::new(MemoryStore::new()),
        Box::new(SqliteStore::open_in_memory().unwrap()),
    ]
}

// ── Append & query ───────────────────────────────────────────────

#[test]
fn append_then_query_returns_record() {
    for store in stores() {
        store.append(&lease_record("g1", "alice", "1.2.3.4")).unwrap();

        let page = store.query(1, 20, None).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].client_id.as_deref(), Some("g1"));
        assert_eq!(page.records[0].username.as_deref(), Some("alice"));
    }
}

#[test]
fn query_is_newest_first() {
    for store in stores() {
        store.append(&lease_record("first", "a", "1.1.1.1")).unwrap();
        store.append(&lease_record("second", "b", "2.2.2.2")).unwrap();

        let page = store.query(1, 20, None).unwrap();
        assert_eq!(page.records[0].client_id.as_deref(), Some("second"));
        assert_eq!(page.records[1].client_id.as_deref(), Some("first"));
    }
}

#[test]
fn pagination_splits_and_reports_total() {
    for store in stores() {
        for i in 0..25 {
            store.append(&lease_record(&format!("g{i}"), "u", "3.3.3.3")).unwrap();
        }

        let p1 = store.query(1, 10, None).unwrap();
        assert_eq!(p1.total, 25);
        assert_eq!(p1.records.len(), 10);
        assert_eq!(p1.records[0].client_id.as_deref(), Some("g24"));

        let p3 = store.query(3, 10, None).unwrap();
        assert_eq!(p3.records.len(), 5);
        assert_eq!(p3.records[4].client_id.as_deref(), Some("g0"));

        let p4 = store.query(4, 10, None).unwrap();
        assert!(p4.records.is_empty());
    }
}

#[test]
fn page_zero_is_treated_as_first_page() {
    for store in stores() {
        store.append(&lease_record("g", "u", "4.4.4.4")).unwrap();
        let page = store.query(0, 10, None).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.records.len(), 1);
    }
}

// ── Search ───────────────────────────────────────────────────────

#[test]
fn search_matches_client_id_ip_and_username() {
    for store in stores() {
        store.append(&lease_record("guid-alpha", "alice", "10.1.1.1")).unwrap();
        store.append(&lease_record("guid-beta", "bob", "192.168.0.7")).unwrap();

        assert_eq!(store.query(1, 20, Some("alpha")).unwrap().total, 1);
        assert_eq!(store.query(1, 20, Some("bob")).unwrap().total, 1);
        assert_eq!(store.query(1, 20, Some("192.168")).unwrap().total, 1);
        assert_eq!(store.query(1, 20, Some("guid-")).unwrap().total, 2);
        assert_eq!(store.query(1, 20, Some("nomatch")).unwrap().total, 0);
    }
}

#[test]
fn empty_search_returns_everything() {
    for store in stores() {
        store.append(&lease_record("g", "u", "5.5.5.5")).unwrap();
        assert_eq!(store.query(1, 20, Some("")).unwrap().total, 1);
    }
}

// ── Stats ────────────────────────────────────────────────────────

#[test]
fn stats_count_by_product_and_day() {
    for store in stores() {
        store.append(&lease_record("g1", "a", "1.1.1.1")).unwrap();
        store.append(&lease_record("g2", "b", "1.1.1.2")).unwrap();
        store.append(&ticket_record("c")).unwrap();

        let mut old = ticket_record("d");
        old.timestamp = Utc::now() - Duration::days(3);
        store.append(&old).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.today, 3);
        assert_eq!(stats.lease, 2);
        assert_eq!(stats.ticket, 2);
    }
}

// ── Memory cap ───────────────────────────────────────────────────

#[test]
fn memory_store_caps_at_limit_keeping_newest() {
    let store = MemoryStore::new();
    for i in 0..(MEMORY_STORE_CAP + 5) {
        store.append(&lease_record(&format!("g{i}"), "u", "6.6.6.6")).unwrap();
    }

    let page = store.query(1, 1, None).unwrap();
    assert_eq!(page.total, MEMORY_STORE_CAP as u64);
    assert_eq!(
        page.records[0].client_id.as_deref(),
        Some(format!("g{}", MEMORY_STORE_CAP + 4).as_str())
    );
}

// ── SQLite persistence ───────────────────────────────────────────

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.append(&lease_record("keep", "alice", "7.7.7.7")).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let page = store.query(1, 10, None).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].client_id.as_deref(), Some("keep"));
    assert_eq!(page.records[0].user_agent, "test-agent/1.0");
}

#[test]
fn sqlite_roundtrips_timestamps() {
    let store = SqliteStore::open_in_memory().unwrap();
    let rec = lease_record("ts", "u", "8.8.8.8");
    store.append(&rec).unwrap();

    let got = &store.query(1, 1, None).unwrap().records[0];
    // RFC 3339 keeps sub-second precision.
    assert_eq!(got.timestamp, rec.timestamp);
}
