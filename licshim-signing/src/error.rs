//! Error types for key decoding and signing.

use thiserror::Error;

/// Signing-specific errors.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Embedded key blob is not valid base64.
    #[error("invalid key base64: {0}")]
    KeyBase64(#[from] base64::DecodeError),

    /// Decoded key bytes are not a valid PKCS#1 RSA private key.
    #[error("invalid PKCS#1 key DER: {0}")]
    KeyDer(#[from] rsa::pkcs1::Error),

    /// The RSA signing primitive failed.
    #[error("rsa signing failed: {0}")]
    Rsa(#[from] rsa::Error),
}

/// Result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;
