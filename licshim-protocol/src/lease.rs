//! Lease protocol responder.
//!
//! The lease grant is a flat JSON record; the signature inside it covers a
//! `;`-delimited string of the client randomness, the fixed server
//! randomness, the client guid, the offline flag, and (offline only) the
//! validity window. Serde serializes struct fields in declaration order,
//! so the declarations below double as the wire field order.

use serde::Serialize;
use tracing::{debug, warn};

use licshim_signing::{Protocol, SigningService};

use crate::constants::{
    DEFAULT_COMPANY, LICENSE_VALID_FROM_MS, LICENSE_VALID_UNTIL_MS, OFFLINE_LEASE_WINDOW_MS,
    SERVER_GUID, SERVER_PROTOCOL_VERSION, SERVER_RANDOMNESS, SERVER_VERSION,
};
use crate::error::{ProtocolError, ProtocolResult};

/// An inbound lease request, already extracted from transport parameters.
#[derive(Debug, Clone, Default)]
pub struct LeaseRequest {
    /// Client-supplied randomness, mixed into the signing payload.
    pub randomness: String,
    /// Username, echoed back as `company`.
    pub username: String,
    /// Client installation guid.
    pub guid: String,
    /// Offline mode: grants a fixed validity window instead of a session lease.
    pub offline: bool,
    /// Client clock in epoch millis; offline grants anchor the window here.
    pub client_time: Option<i64>,
}

/// A granted lease, serialized verbatim to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseGrant {
    pub server_version: &'static str,
    pub server_protocol_version: &'static str,
    pub server_guid: &'static str,
    pub group_type: &'static str,
    pub id: u32,
    pub license_type: u32,
    pub evaluation_license: bool,
    pub signature: String,
    pub server_randomness: &'static str,
    pub seat_pool_type: &'static str,
    pub status_code: &'static str,
    pub offline: bool,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub company: String,
    pub order_id: &'static str,
    pub zero_ids: Vec<String>,
    pub license_valid_from: i64,
    pub license_valid_until: i64,
}

/// Release acknowledgement. Unconditional: no validation, no signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseReleaseAck {
    pub server_version: &'static str,
    pub server_protocol_version: &'static str,
    pub server_guid: &'static str,
    pub group_type: &'static str,
    pub status_code: &'static str,
    pub msg: Option<String>,
    pub status_message: Option<String>,
    pub company: String,
}

/// Connection probe response. Fixed "can get a lease" status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub server_version: &'static str,
    pub server_protocol_version: &'static str,
    pub server_guid: &'static str,
    pub group_type: &'static str,
    pub status_code: &'static str,
    pub company: &'static str,
    pub can_get_lease: bool,
    pub license_type: u32,
    pub evaluation_license: bool,
    pub seat_pool_type: &'static str,
}

/// Grants a lease.
///
/// # Errors
///
/// Rejects when `randomness`, `username`, or `guid` is empty. The caller
/// maps the rejection to HTTP 403 with an empty body.
pub fn grant(signer: &SigningService, req: &LeaseRequest) -> ProtocolResult<LeaseGrant> {
    if req.randomness.is_empty() {
        return Err(ProtocolError::MissingField("randomness"));
    }
    if req.username.is_empty() {
        return Err(ProtocolError::MissingField("username"));
    }
    if req.guid.is_empty() {
        return Err(ProtocolError::MissingField("guid"));
    }

    let (valid_from, valid_until) = if req.offline {
        let from = req
            .client_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        (Some(from), Some(from + OFFLINE_LEASE_WINDOW_MS))
    } else {
        (None, None)
    };

    let payload = signing_payload(&req.randomness, &req.guid, valid_from, valid_until);
    debug!("lease signing payload: {payload}");

    let signature = signer.sign(Protocol::Lease, payload.as_bytes());
    if signature.is_degraded() {
        warn!("issuing lease with degraded signature for guid {}", req.guid);
    }

    Ok(LeaseGrant {
        server_version: SERVER_VERSION,
        server_protocol_version: SERVER_PROTOCOL_VERSION,
        server_guid: SERVER_GUID,
        group_type: "managed",
        id: 1,
        license_type: 1,
        evaluation_license: false,
        signature: signature.into_string(),
        server_randomness: SERVER_RANDOMNESS,
        seat_pool_type: "standalone",
        status_code: "SUCCESS",
        offline: req.offline,
        valid_from,
        valid_until,
        company: req.username.clone(),
        order_id: "",
        zero_ids: Vec::new(),
        license_valid_from: LICENSE_VALID_FROM_MS,
        license_valid_until: LICENSE_VALID_UNTIL_MS,
    })
}

/// The exact string the lease signature covers.
fn signing_payload(
    randomness: &str,
    guid: &str,
    valid_from: Option<i64>,
    valid_until: Option<i64>,
) -> String {
    match (valid_from, valid_until) {
        (Some(from), Some(until)) => {
            format!("{randomness};{SERVER_RANDOMNESS};{guid};true;{from};{until}")
        }
        _ => format!("{randomness};{SERVER_RANDOMNESS};{guid};false"),
    }
}

/// Releases a lease. Always succeeds; echoes the username.
#[must_use]
pub fn release(username: Option<&str>) -> LeaseReleaseAck {
    LeaseReleaseAck {
        server_version: SERVER_VERSION,
        server_protocol_version: SERVER_PROTOCOL_VERSION,
        server_guid: SERVER_GUID,
        group_type: "managed",
        status_code: "SUCCESS",
        msg: None,
        status_message: None,
        company: username.filter(|u| !u.is_empty()).unwrap_or(DEFAULT_COMPANY).to_string(),
    }
}

/// Connection probe. Always reports that a lease is available.
#[must_use]
pub fn validate_connection() -> ConnectionStatus {
    ConnectionStatus {
        server_version: SERVER_VERSION,
        server_protocol_version: SERVER_PROTOCOL_VERSION,
        server_guid: SERVER_GUID,
        group_type: "managed",
        status_code: "SUCCESS",
        company: DEFAULT_COMPANY,
        can_get_lease: true,
        license_type: 1,
        evaluation_license: false,
        seat_pool_type: "standalone",
    }
}
