//! Single-value sealing with ChaCha20-Poly1305.
//!
//! A sealed value is a string token:
//!
//! ```text
//! pii:v1:<base64(nonce || ciphertext || tag)>
//! ```
//!
//! The prefix makes sealed state detectable without guessing from content,
//! and is bound into the AEAD as associated data so a token cannot be
//! relabelled to another version.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::{error::CryptoError, key::KeyMaterial};

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Prefix marking a string as sealed.
pub const TOKEN_PREFIX: &str = "pii:v1:";

const ASSOCIATED_DATA: &[u8] = b"pii:v1";

/// An opaque, authenticated, string-representable ciphertext.
///
/// A corrupted token never opens to altered plaintext. Which error it
/// produces depends on where the damage is:
///
/// - a changed prefix fails with [`CryptoError::MalformedInput`], since the
///   token no longer reads as sealed;
/// - a body character swapped for another base64 symbol still decodes, and
///   fails authentication with [`CryptoError::Decryption`];
/// - a body that no longer decodes (a symbol outside the alphabet, broken
///   padding, stray bits in the final symbol) or that decodes to fewer than
///   nonce plus tag bytes fails with [`CryptoError::MalformedInput`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SealedValue {
    token: String,
}

impl SealedValue {
    /// Returns `true` if `value` carries the sealed prefix.
    ///
    /// This is a state check, not a validity check: use [`SealedValue::parse`]
    /// to verify structure.
    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(TOKEN_PREFIX)
    }

    /// Validates the structure of a sealed token.
    pub fn parse(token: &str) -> Result<Self, CryptoError> {
        decode(token)?;
        Ok(Self {
            token: token.to_owned(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }
}

impl fmt::Debug for SealedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SealedValue").field(&self.token).finish()
    }
}

impl fmt::Display for SealedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl AsRef<str> for SealedValue {
    fn as_ref(&self) -> &str {
        &self.token
    }
}

impl From<SealedValue> for String {
    fn from(value: SealedValue) -> Self {
        value.token
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SealedValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SealedValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token).map_err(serde::de::Error::custom)
    }
}

/// Splits a token into nonce and ciphertext (with tag).
fn decode(token: &str) -> Result<([u8; NONCE_SIZE], Vec<u8>), CryptoError> {
    let encoded = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| CryptoError::MalformedInput("missing sealed prefix".to_string()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CryptoError::MalformedInput(format!("invalid base64: {e}")))?;

    if bytes.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::MalformedInput("data too short".to_string()));
    }

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
    Ok((nonce, bytes[NONCE_SIZE..].to_vec()))
}

/// Encrypts `plaintext` under `key` with a fresh random nonce.
pub fn seal(plaintext: &str, key: &KeyMaterial) -> Result<SealedValue, CryptoError> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::Encryption(format!("nonce generation failed: {e}")))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext.as_bytes(),
                aad: ASSOCIATED_DATA,
            },
        )
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut bytes = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    bytes.extend_from_slice(&nonce_bytes);
    bytes.extend_from_slice(&ciphertext);

    Ok(SealedValue {
        token: format!("{TOKEN_PREFIX}{}", STANDARD.encode(&bytes)),
    })
}

/// Authenticates and decrypts a sealed value.
///
/// Fails with [`CryptoError::Decryption`] on a wrong key or tampered
/// ciphertext, and with [`CryptoError::MalformedInput`] when the token does
/// not decode. See [`SealedValue`] for how damage maps to each.
pub fn open(sealed: &SealedValue, key: &KeyMaterial) -> Result<String, CryptoError> {
    let (nonce_bytes, ciphertext) = decode(&sealed.token)?;
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: &ciphertext,
                aad: ASSOCIATED_DATA,
            },
        )
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::MalformedInput(format!("invalid UTF-8: {e}")))
}

/// Parses and opens a raw token in one step.
///
/// Plain text that was never sealed is reported as
/// [`CryptoError::MalformedInput`].
pub fn open_token(token: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
    open(&SealedValue::parse(token)?, key)
}
