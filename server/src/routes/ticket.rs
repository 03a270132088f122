//! Ticket protocol endpoints.
//!
//! The genuine server hands XML back under a `text/html` content type;
//! clients depend on it, so it is preserved verbatim.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use licshim_audit::{UsageRecord, PRODUCT_TICKET};
use licshim_protocol as protocol;
use licshim_protocol::{ProtocolResult, SignedXml};

use crate::params::{client_ip, user_agent, MergedParams};
use crate::AppState;

const TICKET_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn xml_response(result: ProtocolResult<SignedXml>) -> Response {
    match result {
        Ok(signed) => (
            [(header::CONTENT_TYPE, TICKET_CONTENT_TYPE)],
            signed.to_wire(),
        )
            .into_response(),
        Err(e) => {
            debug!("rejecting ticket request: {e}");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// `GET|POST /rpc/ping.action`.
pub async fn ping(State(state): State<AppState>, params: MergedParams) -> Response {
    xml_response(protocol::ping(&state.signer, params.get_or_empty("salt")))
}

/// `GET|POST /rpc/obtainTicket.action`.
pub async fn obtain(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    params: MergedParams,
) -> Response {
    let salt = params.get_or_empty("salt");
    let username = params.get_or_empty("userName");

    let result = protocol::obtain_ticket(&state.signer, salt, username);
    if result.is_ok() {
        let mut record = UsageRecord::now(PRODUCT_TICKET, "obtainTicket");
        record.username = Some(username.to_string());
        record.ip = client_ip(&headers, peer);
        record.user_agent = user_agent(&headers);
        state.audit.record(record);
    }
    xml_response(result)
}

/// `GET|POST /rpc/releaseTicket.action`.
pub async fn release(State(state): State<AppState>, params: MergedParams) -> Response {
    xml_response(protocol::release_ticket(
        &state.signer,
        params.get_or_empty("salt"),
    ))
}
