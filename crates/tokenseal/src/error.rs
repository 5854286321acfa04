//! Error types for configuration, construction, and token decoding.

use std::fmt;

use thiserror::Error;

use crate::crypto::CipherId;

/// Hard failures raised while resolving or constructing an encryption context.
///
/// None of these are recoverable by retrying with the same configuration;
/// they surface at instance resolution rather than on a later encode call.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration group has no encryption key.
    #[error("no encryption key is defined in the encryption configuration group: {0}")]
    MissingKey(String),

    /// The cipher token is not one of the supported identifiers.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// The key was rejected by the cipher primitive.
    #[error("invalid key length for {cipher}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        cipher: CipherId,
        expected: usize,
        actual: usize,
    },

    /// Configuration sources could not be built or deserialised.
    #[error("configuration error: {0}")]
    Config(String),

    /// The cipher is recognised but this platform cannot run it.
    #[error("{0} is not supported on this platform")]
    CipherUnavailable(CipherId),

    /// The crypto backend cannot operate at all (e.g. no OS entropy source).
    #[error("crypto backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Sealing failed inside the AEAD primitive.
    #[error("{0} encryption failed")]
    Encode(CipherId),
}

/// Coarse classification of [`Error`] used for propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration; fix the config and restart.
    Configuration,
    /// The runtime lacks the required crypto support.
    UnavailableBackend,
    /// An unexpected failure inside the primitive.
    Internal,
}

impl Error {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingKey(_)
            | Error::UnsupportedCipher(_)
            | Error::InvalidKeyLength { .. }
            | Error::Config(_) => ErrorKind::Configuration,
            Error::CipherUnavailable(_) | Error::BackendUnavailable(_) => {
                ErrorKind::UnavailableBackend
            }
            Error::Encode(_) => ErrorKind::Internal,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

/// Why a token could not be decoded.
///
/// Only visible inside the crate. Callers see a uniform [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeFailure {
    /// The token is not strict, padded, standard-alphabet base64.
    InvalidEncoding,
    /// The decoded bytes are shorter than the cipher's nonce.
    Truncated,
    /// Tag verification failed: corruption, tampering, or the wrong key.
    AuthenticationFailed,
    /// The plaintext authenticated but is not UTF-8 (`decode_utf8` only).
    InvalidUtf8,
}

/// A token could not be decoded.
///
/// Carries no public detail: malformed encoding, truncation and
/// authentication failure all look the same to the caller.
#[derive(Clone)]
pub struct DecodeError {
    cause: DecodeFailure,
}

impl DecodeError {
    pub(crate) fn new(cause: DecodeFailure) -> Self {
        Self { cause }
    }

    pub(crate) fn cause(&self) -> DecodeFailure {
        self.cause
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecodeError")
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("decode failed")
    }
}

impl std::error::Error for DecodeError {}
