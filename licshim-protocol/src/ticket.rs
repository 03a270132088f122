//! Ticket protocol responder.
//!
//! Responses are XML fragments built positionally: element order and the
//! tab-delimited `ticketProperties` micro-format are matched verbatim
//! against the genuine server. The signature covers the exact serialized
//! XML bytes and is emitted as a leading comment:
//!
//! ```text
//! <!-- 0a1b2c... -->
//! <ObtainTicketResponse>...</ObtainTicketResponse>
//! ```
//!
//! Clients locate and strip the comment prefix (one newline separator)
//! before parsing the remainder as XML.

use licshim_signing::{Protocol, Signature, SigningService};
use tracing::warn;

use crate::constants::{PROLONGATION_PERIOD, TICKET_ID};
use crate::error::{ProtocolError, ProtocolResult};

/// A signed XML response: the body plus the tagged signature over it.
#[derive(Debug, Clone)]
pub struct SignedXml {
    signature: Signature,
    body: String,
}

impl SignedXml {
    fn new(signer: &SigningService, body: String) -> Self {
        let signature = signer.sign(Protocol::Ticket, body.as_bytes());
        if signature.is_degraded() {
            warn!("issuing ticket response with degraded signature");
        }
        Self { signature, body }
    }

    /// The signature over the XML body.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The bare XML body the signature covers.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The full wire form: comment-prefixed signature, one newline, body.
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!("<!-- {} -->\n{}", self.signature.as_str(), self.body)
    }
}

/// Ping probe.
///
/// # Errors
///
/// Rejects on an empty salt; the caller maps this to HTTP 403, empty body.
pub fn ping(signer: &SigningService, salt: &str) -> ProtocolResult<SignedXml> {
    if salt.is_empty() {
        return Err(ProtocolError::MissingField("salt"));
    }
    let body = format!(
        "<PingResponse><message></message><responseCode>OK</responseCode><salt>{salt}</salt></PingResponse>"
    );
    Ok(SignedXml::new(signer, body))
}

/// Issues a ticket.
///
/// The `ticketProperties` value is a tab-delimited `key=value` micro-format;
/// the trailing tab is significant to client parsers.
///
/// # Errors
///
/// Rejects when salt or username is empty.
pub fn obtain_ticket(
    signer: &SigningService,
    salt: &str,
    username: &str,
) -> ProtocolResult<SignedXml> {
    if salt.is_empty() {
        return Err(ProtocolError::MissingField("salt"));
    }
    if username.is_empty() {
        return Err(ProtocolError::MissingField("userName"));
    }
    let body = format!(
        "<ObtainTicketResponse><message></message>\
         <prolongationPeriod>{PROLONGATION_PERIOD}</prolongationPeriod>\
         <responseCode>OK</responseCode><salt>{salt}</salt>\
         <ticketId>{TICKET_ID}</ticketId>\
         <ticketProperties>licensee={username}\tlicenseType=0\t</ticketProperties>\
         </ObtainTicketResponse>"
    );
    Ok(SignedXml::new(signer, body))
}

/// Releases a ticket.
///
/// # Errors
///
/// Rejects on an empty salt.
pub fn release_ticket(signer: &SigningService, salt: &str) -> ProtocolResult<SignedXml> {
    if salt.is_empty() {
        return Err(ProtocolError::MissingField("salt"));
    }
    let body = format!(
        "<ReleaseTicketResponse><message></message><responseCode>OK</responseCode><salt>{salt}</salt></ReleaseTicketResponse>"
    );
    Ok(SignedXml::new(signer, body))
}
