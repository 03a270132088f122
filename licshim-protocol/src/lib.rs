//! Protocol responders for the two emulated licensing protocols.
//!
//! Everything on the wire here is a compatibility contract: JSON field
//! names and their order, the XML element sequence, the `;`-delimited
//! signing payloads, and the `<!-- signature -->` comment prefix are all
//! matched byte-for-byte against what the vendor clients expect. Clients
//! do structural string matching, not semantic parsing, so "equivalent"
//! output is not equivalent.
//!
//! Responders are stateless: every grant is independent, and offline vs
//! online is a per-request mode, never a stored session.

mod constants;
mod error;
mod lease;
mod ticket;

pub use constants::*;
pub use error::{ProtocolError, ProtocolResult};
pub use lease::{
    grant, release, validate_connection, ConnectionStatus, LeaseGrant, LeaseReleaseAck,
    LeaseRequest,
};
pub use ticket::{obtain_ticket, ping, release_ticket, SignedXml};
