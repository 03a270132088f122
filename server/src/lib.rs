//! HTTP surface for the licshim license server.
//!
//! The protocol endpoints accept GET and POST interchangeably and merge
//! parameters from the query string, form body, and JSON body (JSON wins,
//! then form, then query). Rejections are always HTTP 403 with an empty
//! body; the vendor clients have no error-message surface.
//!
//! Besides the two wire protocols this crate serves the small operator
//! surfaces: a web console for generating activation links, a
//! token-guarded admin API over the audit history, and a status probe.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use licshim_audit::{AuditHandle, AuditStore};
use licshim_signing::SigningService;

mod pages;
mod params;
mod routes;

pub use params::MergedParams;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub signer: SigningService,
    pub audit: AuditHandle,
    pub store: Arc<dyn AuditStore>,
    /// Bearer token for the admin API; `None` disables it (all 401).
    pub admin_token: Option<String>,
}

/// Builds the full application router.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// handlers can fall back to the socket peer for client IPs.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Web console
        .route("/", get(routes::web::index))
        .route("/generate", post(routes::web::generate))
        .route("/api/status", get(routes::web::api_status))
        // Admin surface
        .route("/admin", get(routes::admin::page))
        .route("/api/admin/records", get(routes::admin::records))
        .route("/api/admin/stats", get(routes::admin::stats))
        // Lease protocol
        .route("/jrebel/leases", get(routes::lease::grant).post(routes::lease::grant))
        .route("/agent/leases", get(routes::lease::grant).post(routes::lease::grant))
        .route(
            "/jrebel/leases/1",
            get(routes::lease::release)
                .post(routes::lease::release)
                .delete(routes::lease::release),
        )
        .route(
            "/agent/leases/1",
            get(routes::lease::release)
                .post(routes::lease::release)
                .delete(routes::lease::release),
        )
        .route(
            "/jrebel/validate-connection",
            get(routes::lease::validate).post(routes::lease::validate),
        )
        // Ticket protocol
        .route("/rpc/ping.action", get(routes::ticket::ping).post(routes::ticket::ping))
        .route(
            "/rpc/obtainTicket.action",
            get(routes::ticket::obtain).post(routes::ticket::obtain),
        )
        .route(
            "/rpc/releaseTicket.action",
            get(routes::ticket::release).post(routes::ticket::release),
        )
        // Activation info pages for lease clients; explicit routes win.
        .route("/{*path}", get(routes::web::activation))
        .with_state(state)
}
