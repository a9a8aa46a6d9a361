//! Error types for the CMP client.
//!
//! This module defines all error types that can occur while requesting a
//! certificate over CMPv2, from input decoding failures through transport
//! errors to server-side rejections.

use thiserror::Error;

/// Result type alias using [`CmpError`].
pub type Result<T> = std::result::Result<T, CmpError>;

/// Errors that can occur during CMP client operations.
#[derive(Debug, Error)]
pub enum CmpError {
    /// Supplied CSR could not be decoded.
    #[error("CSR decryption error: {0}")]
    CsrDecryption(String),

    /// Supplied private key could not be decoded.
    #[error("Key decryption error: {0}")]
    KeyDecryption(String),

    /// Supplied old certificate could not be decoded.
    #[error("Certificate decryption error: {0}")]
    OldCertificateDecryption(String),

    /// No CA with the requested name is configured.
    #[error("Certification authority not found for given name: {0}")]
    CaNotFound(String),

    /// Malformed or unsupported CMP response structure.
    #[error("CMP protocol error: {0}")]
    Protocol(String),

    /// Signature protection of the response did not verify.
    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    /// Password-based MAC protection of the response did not verify.
    #[error("MAC verification failed: {0}")]
    MacVerification(String),

    /// The CA rejected the certification request.
    #[error("CMP server rejected request: {0}")]
    ServerRejected(String),

    /// RSA key pair generation failed.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// HTTP transport error while exchanging CMP messages.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// DER encoding/decoding error.
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmpError {
    /// Create a CSR decryption error with the given message.
    pub fn csr_decryption(msg: impl Into<String>) -> Self {
        Self::CsrDecryption(msg.into())
    }

    /// Create a key decryption error with the given message.
    pub fn key_decryption(msg: impl Into<String>) -> Self {
        Self::KeyDecryption(msg.into())
    }

    /// Create an old-certificate decryption error with the given message.
    pub fn old_certificate_decryption(msg: impl Into<String>) -> Self {
        Self::OldCertificateDecryption(msg.into())
    }

    /// Create a CA-not-found error for the given CA name.
    pub fn ca_not_found(ca_name: impl Into<String>) -> Self {
        Self::CaNotFound(ca_name.into())
    }

    /// Create a protocol error with the given message.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a signature verification error with the given message.
    pub fn signature_verification(msg: impl Into<String>) -> Self {
        Self::SignatureVerification(msg.into())
    }

    /// Create a MAC verification error with the given message.
    pub fn mac_verification(msg: impl Into<String>) -> Self {
        Self::MacVerification(msg.into())
    }

    /// Create a key generation error with the given message.
    pub fn key_generation(msg: impl Into<String>) -> Self {
        Self::KeyGeneration(msg.into())
    }

    /// Create a server rejection error with the given message.
    pub fn server_rejected(msg: impl Into<String>) -> Self {
        Self::ServerRejected(msg.into())
    }

    /// Returns true if the error was produced before any network exchange.
    ///
    /// Decoding and lookup failures are client-side by construction; the
    /// caller can map them onto a "bad request" outcome without retrying.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::CsrDecryption(_)
                | Self::KeyDecryption(_)
                | Self::OldCertificateDecryption(_)
                | Self::CaNotFound(_)
        )
    }
}
