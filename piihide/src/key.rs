//! Symmetric key material.
//!
//! Keys are opaque: they can be generated and their raw bytes borrowed, but
//! there is no textual conversion, persistence, or import path. The bytes are
//! zeroized when the key is dropped.

use std::fmt;

use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Size of a key in bytes (256 bits for ChaCha20).
pub const KEY_SIZE: usize = 32;

/// The authenticated cipher a key is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// ChaCha20-Poly1305 (RFC 8439).
    ChaCha20Poly1305,
}

impl Algorithm {
    pub const fn key_len(self) -> usize {
        match self {
            Self::ChaCha20Poly1305 => KEY_SIZE,
        }
    }

    pub const fn nonce_len(self) -> usize {
        match self {
            Self::ChaCha20Poly1305 => 12,
        }
    }

    pub const fn tag_len(self) -> usize {
        match self {
            Self::ChaCha20Poly1305 => 16,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A symmetric key for sealing and opening PII fields.
///
/// Immutable once generated. `KeyMaterial` is `Send + Sync`, so one key can
/// serve concurrent traversals over different graphs.
///
/// The bytes are wiped when the key is dropped, and only then. A live key
/// cannot be zeroized in place:
///
/// ```compile_fail
/// use zeroize::Zeroize;
///
/// let mut key = piihide::KeyMaterial::generate().unwrap();
/// key.zeroize();
/// ```
pub struct KeyMaterial {
    bytes: [u8; KEY_SIZE],
}

impl KeyMaterial {
    /// Generates a fresh key from the operating system's CSPRNG.
    ///
    /// Fails with [`Error::KeyGeneration`] if the random source is
    /// unavailable. There is no fallback to a weaker generator.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(Error::KeyGeneration)?;
        Ok(Self { bytes })
    }

    /// Borrows the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    pub fn algorithm(&self) -> Algorithm {
        Algorithm::ChaCha20Poly1305
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for KeyMaterial {}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm())
            .field("bytes", &crate::PII_PLACEHOLDER)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Algorithm, KeyMaterial, KEY_SIZE};

    #[test]
    fn generated_keys_have_algorithm_length() {
        let key = KeyMaterial::generate().unwrap();
        assert_eq!(key.len(), KEY_SIZE);
        assert_eq!(key.algorithm().key_len(), key.len());
        assert_eq!(key.algorithm(), Algorithm::ChaCha20Poly1305);
    }

    #[test]
    fn generated_keys_differ() {
        let first = KeyMaterial::generate().unwrap();
        let second = KeyMaterial::generate().unwrap();
        assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn debug_never_prints_bytes() {
        let key = KeyMaterial::generate().unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("[PII]"));
        assert!(rendered.contains("ChaCha20Poly1305"));
        assert!(!rendered.contains(&format!("{:?}", key.as_bytes()[0..4].to_vec())));
    }

    #[test]
    fn key_is_wiped_on_drop() {
        fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<KeyMaterial>();
    }

    #[test]
    fn key_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeyMaterial>();
    }
}
