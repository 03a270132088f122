//! Token-guarded admin API over the audit history.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use licshim_audit::AuditStore;

use crate::pages::ADMIN_HTML;
use crate::AppState;

/// `GET /admin` — dashboard page.
pub async fn page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.admin_token.as_deref() else {
        return false;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Unauthorized"})),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default)]
    search: String,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

/// `GET /api/admin/records` — paginated, searchable usage history.
pub async fn records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecordsQuery>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let store = Arc::clone(&state.store);
    let search = query.search.trim().to_string();
    let result = tokio::task::spawn_blocking(move || {
        let search = (!search.is_empty()).then_some(search.as_str());
        store.query(query.page, query.page_size, search)
    })
    .await;

    match result {
        Ok(Ok(page)) => Json(page).into_response(),
        Ok(Err(e)) => {
            warn!("audit query failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            warn!("audit query task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /api/admin/stats` — aggregate usage counters.
pub async fn stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || store.stats()).await {
        Ok(Ok(stats)) => Json(stats).into_response(),
        Ok(Err(e)) => {
            warn!("audit stats failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            warn!("audit stats task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
