//! Error types for key generation, sealing, and traversal.
//!
//! Two layers:
//!
//! - [`CryptoError`]: failures of a single `seal`/`open` call. These carry no
//!   location because the cipher only ever sees one value.
//! - [`Error`]: everything the traverser can report. Every variant raised
//!   during a walk carries the [`FieldPath`] of the offending field.

use thiserror::Error;

use crate::path::FieldPath;

/// Result type for traversal and key operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of a single cipher operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The AEAD refused to encrypt the input.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Authentication failed: wrong key or tampered data.
    #[error("decryption failed (wrong key or tampered data)")]
    Decryption,

    /// The input is not a structurally valid sealed value.
    #[error("malformed sealed value: {0}")]
    MalformedInput(String),
}

/// Errors surfaced by key generation and graph traversal.
///
/// A traversal reports exactly one terminal error: the first one hit in
/// declaration order. Mutations applied before that point are not rolled back.
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system's secure random source is unavailable.
    #[error("secure random source unavailable: {0}")]
    KeyGeneration(#[source] rand::Error),

    /// A sensitive leaf was already sealed when encryption was requested.
    #[error("field `{path}` is already sealed")]
    AlreadySealed { path: FieldPath },

    /// A sensitive leaf was plaintext when decryption was requested.
    #[error("field `{path}` is not sealed")]
    NotSealed { path: FieldPath },

    /// Sealing a field failed.
    #[error("failed to seal field `{path}`: {reason}")]
    Encryption { path: FieldPath, reason: String },

    /// A sealed field failed authentication under the supplied key.
    #[error("failed to open field `{path}` (wrong key or tampered data)")]
    Decryption { path: FieldPath },

    /// A field carries the sealed prefix but is not a valid sealed value.
    #[error("field `{path}` holds a malformed sealed value: {reason}")]
    MalformedInput { path: FieldPath, reason: String },

    /// The graph nests deeper than the configured limit.
    #[error("traversal exceeded the depth limit of {limit} at `{path}`")]
    DepthExceeded { path: FieldPath, limit: usize },
}

impl Error {
    /// Attaches a field path to a cipher failure.
    pub(crate) fn at(err: CryptoError, path: &FieldPath) -> Self {
        let path = path.clone();
        match err {
            CryptoError::Encryption(reason) => Self::Encryption { path, reason },
            CryptoError::Decryption => Self::Decryption { path },
            CryptoError::MalformedInput(reason) => Self::MalformedInput { path, reason },
        }
    }

    /// Returns the path of the field that caused the error, if any.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::KeyGeneration(_) => None,
            Self::AlreadySealed { path }
            | Self::NotSealed { path }
            | Self::Encryption { path, .. }
            | Self::Decryption { path }
            | Self::MalformedInput { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
        }
    }
}
