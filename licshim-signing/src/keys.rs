//! Embedded RSA private keys, decoded once at process start.
//!
//! The blobs are base64-encoded PKCS#1 DER, byte-for-byte the key material
//! the vendor clients were shipped to verify against. There is no key
//! generation and no hot reload: the store is built once and shared
//! read-only for the lifetime of the process.

use crate::error::SigningResult;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;
use tracing::{info, warn};

/// Private key for the lease protocol (1024-bit RSA, PKCS#1 DER).
const LEASE_KEY_B64: &str = concat!(
    "MIICXAIBAAKBgQDQ93CP6SjEneDizCF1P/MaBGf582voNNFcu8oMhgdTZ/N6qa6O",
    "7XJDr1FSCyaDdKSsPCdxPK7Y4Usq/fOPas2kCgYcRS/iebrtPEFZ/7TLfk39HLuT",
    "Ejzo0/CNvjVsgWeh9BYznFaxFDLx7fLKqCQ6w1OKScnsdqwjpaXwXqiulwIDAQAB",
    "AoGATOQvvBSMVsTNQkbgrNcqKdGjPNrwQtJkk13aO/95ZJxkgCc9vwPqPrOdFbZa",
    "ppZeHa5IyScOI2nLEfe+DnC7V80K2dBtaIQjOeZQt5HoTRG4EHQaWoDh27BWuJoi",
    "p5WMrOd+1qfkOtZoRjNcHl86LIAh/+3vxYyebkug4UHNGPkCQQD+N4ZUkhKNQW7m",
    "pxX6eecitmOdN7Yt0YH9UmxPiW1LyCEbLwduMR2tfyGfrbZALiGzlKJize38shGC",
    "1qYSMvZFAkEA0m6psWWiTUWtaOKMxkTkcUdigalZ9xFSEl6jXFB94AD+dlPS3J5g",
    "NzTEmbPLc14VIWJFkO+UOrpl77w5uF2dKwJAaMpslhnsicvKMkv31FtBut5iK6GW",
    "eEafhdPfD94/bnidpP362yJl8Gmya4cI1GXvwH3pfj8S9hJVA5EFvgTB3QJBAJP1",
    "O1uAGp46X7Nfl5vQ1M7RYnHIoXkWtJ417Kb78YWPLVwFlD2LHhuy/okT4fk8LZ9L",
    "eZ5u1cp1RTdLIUqAiAECQC46OwOm87L35yaVfpUIjqg/1gsNwNsj8HvtXdF/9d30",
    "JIM3GwdytCvNRLqP35Ciogb9AO8ke8L6zY83nxPbClM=",
);

/// Private key for the ticket protocol (512-bit RSA, PKCS#1 DER).
const TICKET_KEY_B64: &str = concat!(
    "MIIBOgIBAAJBALecq3BwAI4YJZwhJ+snnDFj3lF3DMqNPorV6y5ZKXCiCMqj8OeO",
    "mxk4YZW9aaV9ckl/zlAOI0mpB3pDT+Xlj2sCAwEAAQJAW6/aVD05qbsZHMvZuS2A",
    "a5FpNNj0BDlf38hOtkhDzz/hkYb+EBYLLvldhgsD0OvRNy8yhz7EjaUqLCB0juIN",
    "4QIhAOeCQp+NXxfBmfdG/S+XbRUAdv8iHBl+F6O2wr5fA2jzAiEAywlDfGIl6acn",
    "akPrmJE0IL8qvuO3FtsHBrpkUuOnXakCIQCqdr+XvADI/UThTuQepuErFayJMBSA",
    "sNe3NFsw0cUxAQIgGA5n7ZPfdBi3BdM4VeJWb87WrLlkVxPqeDSbcGrCyMkCIFSs",
    "5JyXvFTreWt7IQjDssrKDRIPmALdNjvfETwlNJyY",
);

/// The two wire protocols the server speaks. Each is statically bound to
/// one key and one signing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Lease-based protocol (JSON responses, SHA1/base64 signatures).
    Lease,
    /// Ticket-based protocol (XML responses, MD5/hex signatures).
    Ticket,
}

/// Read-only holder for the two protocol keys.
///
/// A slot is `None` when its blob failed to decode at startup; the signing
/// service then degrades for that protocol instead of erroring per request.
pub struct KeyStore {
    lease: Option<RsaPrivateKey>,
    ticket: Option<RsaPrivateKey>,
}

impl KeyStore {
    /// Decodes both embedded key blobs. Never fails: a bad blob is logged
    /// and its slot left unavailable.
    #[must_use]
    pub fn from_embedded() -> Self {
        Self::with_keys(
            decode_embedded(Protocol::Lease, LEASE_KEY_B64),
            decode_embedded(Protocol::Ticket, TICKET_KEY_B64),
        )
    }

    /// Builds a store from explicit keys. Used by tests to substitute a
    /// generated key pair for round-trip verification.
    #[must_use]
    pub fn with_keys(lease: Option<RsaPrivateKey>, ticket: Option<RsaPrivateKey>) -> Self {
        Self { lease, ticket }
    }

    /// A store with no keys at all, for exercising degraded signing.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_keys(None, None)
    }

    /// Returns the key bound to a protocol, if it decoded successfully.
    #[must_use]
    pub fn get(&self, protocol: Protocol) -> Option<&RsaPrivateKey> {
        match protocol {
            Protocol::Lease => self.lease.as_ref(),
            Protocol::Ticket => self.ticket.as_ref(),
        }
    }

    /// Returns true if a real key is available for the protocol.
    #[must_use]
    pub fn is_available(&self, protocol: Protocol) -> bool {
        self.get(protocol).is_some()
    }
}

fn decode_embedded(protocol: Protocol, blob: &str) -> Option<RsaPrivateKey> {
    match decode_key(blob) {
        Ok(key) => {
            info!("loaded {:?} protocol signing key", protocol);
            Some(key)
        }
        Err(e) => {
            warn!("failed to decode {:?} protocol key, signing will degrade: {e}", protocol);
            None
        }
    }
}

/// Decodes a base64 PKCS#1 DER blob into an RSA private key.
pub fn decode_key(blob: &str) -> SigningResult<RsaPrivateKey> {
    let der = BASE64.decode(blob)?;
    Ok(RsaPrivateKey::from_pkcs1_der(&der)?)
}
