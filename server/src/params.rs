//! Request parameter extraction and client metadata helpers.
//!
//! The vendor clients are inconsistent about where they put parameters:
//! query string on some calls, urlencoded form on others, JSON from newer
//! agent builds. [`MergedParams`] folds all three into one map with an
//! explicit precedence rule — JSON overrides form overrides query — so
//! handlers never depend on parse order.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};

/// Maximum user-agent length persisted to the audit log.
const USER_AGENT_MAX: usize = 500;

/// Merged request parameters from query string, form body, and JSON body.
#[derive(Debug, Default)]
pub struct MergedParams(HashMap<String, String>);

impl MergedParams {
    /// Returns the parameter value, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the parameter value or an empty string.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// True when the parameter equals `true`, case-insensitively.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    #[cfg(test)]
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl<S> FromRequest<S> for MergedParams
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut map = HashMap::new();

        if let Some(query) = req.uri().query() {
            parse_urlencoded(query, &mut map);
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        if content_type.starts_with("application/x-www-form-urlencoded") {
            if let Ok(body) = std::str::from_utf8(&bytes) {
                parse_urlencoded(body, &mut map);
            }
        } else if content_type.starts_with("application/json") {
            if let Ok(serde_json::Value::Object(obj)) = serde_json::from_slice(&bytes) {
                for (key, value) in obj {
                    if let Some(text) = scalar_to_string(value) {
                        map.insert(key, text);
                    }
                }
            }
        }

        Ok(Self(map))
    }
}

fn parse_urlencoded(input: &str, out: &mut HashMap<String, String>) {
    for pair in input.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        out.insert(decode_component(key), decode_component(value));
    }
}

fn decode_component(raw: &str) -> String {
    // Form encoding uses '+' for spaces; percent-decode the rest.
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|c| c.into_owned())
        .unwrap_or(plus_decoded)
}

/// Normalizes a JSON scalar to its parameter string. Arrays, objects, and
/// nulls carry no parameter value and are skipped.
fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolves the client IP: first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer.
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real = real.trim();
        if !real.is_empty() {
            return real.to_string();
        }
    }
    peer.ip().to_string()
}

/// Returns the user agent truncated for the audit log.
#[must_use]
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .chars()
        .take(USER_AGENT_MAX)
        .collect()
}
