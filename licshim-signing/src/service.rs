//! Signing profiles and the signing service.
//!
//! One profile per protocol, fixed for the lifetime of the process:
//!
//! | Protocol | Digest | Padding     | Output        |
//! |----------|--------|-------------|---------------|
//! | Lease    | SHA-1  | PKCS#1 v1.5 | base64        |
//! | Ticket   | MD5    | PKCS#1 v1.5 | lowercase hex |
//!
//! When the protocol's key is unavailable the service degrades rather than
//! erroring: the hex profile falls back to the plain MD5 hex digest of the
//! payload (shape-compatible, but not a verifiable signature) and the
//! base64 profile to an empty string. The degraded case is a distinct
//! variant so callers and tests can tell it apart from a real signature.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::Md5;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
use tracing::warn;

use crate::error::SigningResult;
use crate::keys::{KeyStore, Protocol};

/// Digest algorithm of a signing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlg {
    Sha1,
    Md5,
}

/// Text encoding of the raw signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEncoding {
    Base64,
    HexLower,
}

/// A fixed hash/padding/encoding combination. Padding is always PKCS#1 v1.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningProfile {
    pub digest: DigestAlg,
    pub encoding: SignatureEncoding,
}

impl Protocol {
    /// The profile statically bound to this protocol.
    #[must_use]
    pub fn profile(self) -> SigningProfile {
        match self {
            Protocol::Lease => SigningProfile {
                digest: DigestAlg::Sha1,
                encoding: SignatureEncoding::Base64,
            },
            Protocol::Ticket => SigningProfile {
                digest: DigestAlg::Md5,
                encoding: SignatureEncoding::HexLower,
            },
        }
    }
}

impl SigningProfile {
    fn encode(self, raw: &[u8]) -> String {
        match self.encoding {
            SignatureEncoding::Base64 => BASE64.encode(raw),
            SignatureEncoding::HexLower => hex::encode(raw),
        }
    }

    /// The key-unavailable fallback text for this profile.
    fn degraded_text(self, payload: &[u8]) -> String {
        match self.encoding {
            // Empty signature field; clients still parse the response.
            SignatureEncoding::Base64 => String::new(),
            // Plain digest in place of a signature, same length and alphabet.
            SignatureEncoding::HexLower => hex::encode(Md5::digest(payload)),
        }
    }
}

/// Outcome of a signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// A real RSA PKCS#1 v1.5 signature, encoded per the profile.
    Signed(String),
    /// Key unavailable (or the primitive failed): the profile's fallback
    /// text. Clients will parse the response but fail verification.
    Degraded(String),
}

impl Signature {
    /// The wire text, regardless of variant.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Signature::Signed(s) | Signature::Degraded(s) => s,
        }
    }

    /// Consumes the signature, returning the wire text.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Signature::Signed(s) | Signature::Degraded(s) => s,
        }
    }

    /// True when this is the key-unavailable fallback, not a signature.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Signature::Degraded(_))
    }
}

/// Stateless signer over the process-wide key store.
#[derive(Clone)]
pub struct SigningService {
    keys: Arc<KeyStore>,
}

impl SigningService {
    #[must_use]
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self { keys }
    }

    /// Returns true if a real key is available for the protocol.
    #[must_use]
    pub fn key_available(&self, protocol: Protocol) -> bool {
        self.keys.is_available(protocol)
    }

    /// Signs `payload` with the protocol's key and profile.
    ///
    /// Deterministic for a fixed key and payload: PKCS#1 v1.5 uses no
    /// randomness, and the vendor clients rely on repeated requests
    /// producing identical signatures.
    #[must_use]
    pub fn sign(&self, protocol: Protocol, payload: &[u8]) -> Signature {
        let profile = protocol.profile();
        let Some(key) = self.keys.get(protocol) else {
            return Signature::Degraded(profile.degraded_text(payload));
        };

        match sign_raw(key, profile.digest, payload) {
            Ok(raw) => Signature::Signed(profile.encode(&raw)),
            Err(e) => {
                warn!("{:?} protocol signing failed, degrading: {e}", protocol);
                Signature::Degraded(profile.degraded_text(payload))
            }
        }
    }
}

fn sign_raw(key: &RsaPrivateKey, digest: DigestAlg, payload: &[u8]) -> SigningResult<Vec<u8>> {
    let raw = match digest {
        DigestAlg::Sha1 => key.sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(payload))?,
        DigestAlg::Md5 => key.sign(Pkcs1v15Sign::new::<Md5>(), &Md5::digest(payload))?,
    };
    Ok(raw)
}
