//! Field-level PII encryption for whole object graphs.
//!
//! Data models mark their personally identifiable fields once, at definition
//! time, and the engine transforms a live graph between plaintext and sealed
//! form in place:
//!
//! ```rust,ignore
//! use piihide::{KeyMaterial, Pii, Protect};
//!
//! #[derive(Pii)]
//! struct Address {
//!     #[pii]
//!     street: String,
//!     country: String,
//! }
//!
//! #[derive(Pii)]
//! struct Person {
//!     id: i64,
//!     #[pii]
//!     name: String,
//!     #[pii(nested)]
//!     address: Address,
//! }
//!
//! let key = KeyMaterial::generate()?;
//! person.encrypt_pii(&key)?;
//! person.decrypt_pii(&key)?;
//! ```
//!
//! Key rules:
//! - Use `#[pii]` for string-like leaf values.
//! - Use `#[pii(nested)]` to walk into another `Pii` type; the child's own
//!   markers decide what is sealed inside it.
//! - Unannotated fields are never touched, even when their type has PII.
//! - Sealed values are ordinary strings prefixed with `pii:v1:`, so any
//!   serializer handles them unchanged.
//!
//! What this crate does not do:
//! - store, import or export keys
//! - detect PII by looking at values
//! - serialize or print graphs

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else,
    clippy::len_without_is_empty
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use piihide_derive::Pii;

#[allow(unused_extern_crates)]
extern crate self as piihide;

// Module declarations
pub mod cipher;
mod engine;
mod error;
mod key;
mod model;
mod path;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use cipher::{open, open_token, seal, SealedValue, NONCE_SIZE, TAG_SIZE, TOKEN_PREFIX};
pub use engine::{
    decrypt_in_place, encrypt_in_place, Direction, Protect, Sealable, TraverseOptions, Traversable,
    Traverser, Walker, DEFAULT_MAX_DEPTH,
};
pub use error::{CryptoError, Error, Result};
pub use key::{Algorithm, KeyMaterial, KEY_SIZE};
pub use model::{describe, Entity, FieldDescriptor, FieldKind, SensitivityRegistry, TypeModel};
pub use path::{FieldPath, Segment};

/// Placeholder printed by generated `Debug` impls in place of PII leaves.
pub const PII_PLACEHOLDER: &str = "[PII]";
