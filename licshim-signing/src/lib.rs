//! Embedded key store and signing service for licshim.
//!
//! This crate owns the cryptographic half of the protocol emulation:
//! - Two RSA private keys, decoded once at startup from blobs baked into
//!   the binary. A key that fails to decode leaves the server running with
//!   degraded signing instead of refusing to start.
//! - A stateless signing service with one fixed profile per protocol:
//!   SHA1-with-RSA emitted as base64 for the lease protocol, MD5-with-RSA
//!   emitted as lowercase hex for the ticket protocol. Both use PKCS#1 v1.5
//!   padding, so signatures are deterministic for a fixed key and payload.
//!
//! The MD5 profile is cryptographically obsolete, and that is the point:
//! the vendor clients verify against exactly this scheme, and changing the
//! digest would make every client reject the response.

mod error;
mod keys;
mod service;

pub use error::{SigningError, SigningResult};
pub use keys::{decode_key, KeyStore, Protocol};
pub use service::{DigestAlg, Signature, SignatureEncoding, SigningProfile, SigningService};
