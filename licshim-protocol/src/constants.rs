//! Server-side wire constants.
//!
//! None of these are derived from the request and none change at runtime.
//! The randomness, guid, and version strings are the fixed literals the
//! vendor clients were observed to accept; the validity window and
//! prolongation period are the values the genuine server hands out.

/// Fixed server randomness echoed in every lease grant and mixed into the
/// signing payload.
pub const SERVER_RANDOMNESS: &str = "H2ulzLlh7E0=";

/// Fixed server identity GUID.
pub const SERVER_GUID: &str = "a1b4aea8-b031-4302-b602-670a990272cb";

/// Reported lease-server version.
pub const SERVER_VERSION: &str = "3.2.4";

/// Reported lease-protocol version.
pub const SERVER_PROTOCOL_VERSION: &str = "1.1";

/// Offline lease validity window: 180 days in milliseconds.
pub const OFFLINE_LEASE_WINDOW_MS: i64 = 180 * 24 * 60 * 60 * 1000;

/// Fixed license validity window reported in every grant (epoch millis).
pub const LICENSE_VALID_FROM_MS: i64 = 1_490_544_001_000;
pub const LICENSE_VALID_UNTIL_MS: i64 = 1_691_839_999_000;

/// Fallback username for release acks and the connection probe.
pub const DEFAULT_COMPANY: &str = "Administrator";

/// Ticket-protocol prolongation period, echoed verbatim.
pub const PROLONGATION_PERIOD: &str = "607875500";

/// The single ticket id the server ever issues.
pub const TICKET_ID: u32 = 1;
