//! Lease protocol endpoints.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use licshim_audit::{UsageRecord, PRODUCT_LEASE};
use licshim_protocol as protocol;
use licshim_protocol::LeaseRequest;

use crate::params::{client_ip, user_agent, MergedParams};
use crate::AppState;

/// `GET|POST /jrebel/leases` and `/agent/leases`.
pub async fn grant(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    params: MergedParams,
) -> Response {
    let req = LeaseRequest {
        randomness: params.get_or_empty("randomness").to_string(),
        username: params.get_or_empty("username").to_string(),
        guid: params.get_or_empty("guid").to_string(),
        offline: params.flag("offline"),
        client_time: params.get("clientTime").and_then(|v| v.parse().ok()),
    };

    match protocol::grant(&state.signer, &req) {
        Ok(grant) => {
            let mut record = UsageRecord::now(PRODUCT_LEASE, "lease");
            record.client_id = Some(req.guid.clone());
            record.username = Some(req.username.clone());
            record.ip = client_ip(&headers, peer);
            record.user_agent = user_agent(&headers);
            state.audit.record(record);

            Json(grant).into_response()
        }
        Err(e) => {
            debug!("rejecting lease request: {e}");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// `GET|POST|DELETE /jrebel/leases/1` and `/agent/leases/1`.
pub async fn release(State(_state): State<AppState>, params: MergedParams) -> Response {
    Json(protocol::release(params.get("username"))).into_response()
}

/// `GET|POST /jrebel/validate-connection`.
pub async fn validate(State(_state): State<AppState>) -> Response {
    Json(protocol::validate_connection()).into_response()
}
