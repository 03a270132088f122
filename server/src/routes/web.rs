//! Web console: activation link generation and the status probe.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use licshim_signing::Protocol;

use crate::pages::{ACTIVATION_HTML, INDEX_HTML};
use crate::params::MergedParams;
use crate::AppState;

/// Reconstructs the externally visible base URL from proxy headers.
fn base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `GET /` — console page.
pub async fn index(headers: HeaderMap) -> Html<String> {
    let page = INDEX_HTML
        .replace("__BASE_URL__", &base_url(&headers))
        .replace("__EXAMPLE_GUID__", &Uuid::new_v4().to_string());
    Html(page)
}

/// `POST /generate` — builds an activation link for one of the protocols.
pub async fn generate(headers: HeaderMap, params: MergedParams) -> Response {
    let product = params.get("product").unwrap_or("lease").to_string();
    let guid = match params.get("guid").map(str::trim) {
        Some(g) if !g.is_empty() => g.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    let base = base_url(&headers);
    let activation_url = if product == "ticket" {
        format!("{base}/")
    } else {
        format!("{base}/{guid}")
    };

    Json(json!({
        "success": true,
        "product": product,
        "guid": guid,
        "activation_url": activation_url,
    }))
    .into_response()
}

/// `GET /api/status` — liveness plus key availability.
pub async fn api_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "lease_signer": state.signer.key_available(Protocol::Lease),
        "ticket_signer": state.signer.key_available(Protocol::Ticket),
    }))
}

/// `GET /{*path}` — activation info page for lease clients, which open
/// their activation link (`{base}/{guid}`) in a browser.
pub async fn activation(headers: HeaderMap, Path(path): Path<String>) -> Response {
    if path.starts_with("static/") || path.starts_with("api/") || path == "admin" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let base = base_url(&headers);
    let guid = html_escape(&path);
    let page = ACTIVATION_HTML
        .replace("__ACTIVATION_URL__", &format!("{base}/{guid}"))
        .replace("__GUID__", &guid);
    Html(page).into_response()
}
