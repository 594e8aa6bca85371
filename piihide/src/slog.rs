//! Adapters for emitting sealed values through `slog`.
//!
//! This module connects the traverser with `slog` by providing a
//! `slog::Value` that serializes a graph *after* its PII has been sealed, as
//! structured JSON via `slog`'s nested-value support.
//!
//! It is responsible for:
//! - Ensuring the logged representation is produced from the sealed graph,
//!   never from the original value.
//! - Avoiding fallible logging APIs: sealing or serialization failures are
//!   represented as placeholder strings rather than propagated as errors.
//!
//! It does not configure `slog` or manage keys.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{engine::Traversable, encrypt_in_place, key::KeyMaterial};

/// Logged in place of a value whose PII could not be sealed.
pub const SEAL_FAILED_PLACEHOLDER: &str = "Failed to seal value";

/// Logged in place of a sealed value that could not be serialized.
pub const SERIALIZE_FAILED_PLACEHOLDER: &str = "Failed to serialize sealed value";

/// A `slog::Value` that emits an owned sealed payload as structured JSON.
pub struct SealedJson {
    value: JsonValue,
}

impl SealedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    /// The JSON that will be logged.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for SealedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their sealed form as JSON.
///
/// ## Example
/// ```ignore
/// use piihide::slog::IntoSealedJson;
///
/// info!(logger, "customer updated"; "customer" => customer.into_sealed_json(&key));
/// ```
pub trait IntoSealedJson: Traversable + Serialize + Sized {
    /// Seals `self` with `key` and returns a `slog::Value` over the result.
    ///
    /// If sealing fails nothing of `self` is logged; the value is replaced by
    /// [`SEAL_FAILED_PLACEHOLDER`].
    fn into_sealed_json(mut self, key: &KeyMaterial) -> SealedJson {
        let json_value = match encrypt_in_place(&mut self, key) {
            Ok(()) => serde_json::to_value(&self)
                .unwrap_or_else(|_| JsonValue::String(SERIALIZE_FAILED_PLACEHOLDER.to_string())),
            Err(_) => JsonValue::String(SEAL_FAILED_PLACEHOLDER.to_string()),
        };
        SealedJson::new(json_value)
    }
}

impl<T> IntoSealedJson for T where T: Traversable + Serialize {}
