//! Error types for the protocol responders.

use thiserror::Error;

/// Responder rejections.
///
/// The vendor protocols have no room for prose errors: every rejection is
/// surfaced to the client as HTTP 403 with an empty body. The field name
/// here exists for logs and tests only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A required request field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type for responder operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
