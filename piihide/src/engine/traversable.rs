//! Capability traits for values the traverser can reach.
//!
//! - [`Traversable`]: types that *contain* PII (derived structs/enums and the
//!   std containers around them). Reached through `#[pii(nested)]`.
//! - [`Sealable`]: types that *are* PII (strings and containers of strings).
//!   Reached through `#[pii]`.
//!
//! ## Container Implementations
//!
//! Both traits are implemented for `Option`, `Vec`, slices, `Box`, `BTreeMap`
//! and `HashMap` (values only; keys are never transformed). `None` and empty
//! containers are no-ops. Sets are not supported because their elements cannot
//! be mutated in place.
//!
//! ## Custom leaf types
//!
//! Orphan rules prevent implementing `Sealable` for foreign string types. Wrap
//! them in a local newtype and forward to [`Walker::transform_text`]:
//!
//! ```rust,ignore
//! struct Email(String);
//!
//! impl piihide::Sealable for Email {
//!     fn transform_leaf(&mut self, walker: &mut piihide::Walker<'_>) -> piihide::Result<()> {
//!         walker.transform_text(&mut self.0)
//!     }
//! }
//! ```

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    fmt::Display,
    hash::BuildHasher,
};

use zeroize::Zeroize;

use super::walker::Walker;
use crate::{error::Result, path::Segment};

/// A value that can be walked for sensitive fields.
///
/// Implemented by `#[derive(Pii)]`. Walking mutates in place and stops at the
/// first error.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Traversable`",
    label = "this type cannot be walked for PII",
    note = "use `#[derive(Pii)]` on the type definition",
    note = "or use `#[pii]` if this is a leaf value like String"
)]
pub trait Traversable {
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()>;
}

/// A string-like value that can be sealed and opened in place.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Sealable` value",
    label = "this type cannot be sealed directly",
    note = "`#[pii]` is for leaf values (String, Option<String>, Vec<String>, ...)",
    note = "if `{Self}` is a struct that derives `Pii`, use `#[pii(nested)]` instead to walk into it"
)]
pub trait Sealable {
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()>;
}

// =============================================================================
// Sealable implementations
// =============================================================================

impl Sealable for String {
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        walker.transform_text(self)
    }
}

impl Sealable for Cow<'_, str> {
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        match self {
            // Owned text goes through the `String` path, which wipes it.
            Cow::Owned(text) => walker.transform_text(text),
            Cow::Borrowed(text) => {
                let borrowed: &str = *text;
                let mut owned = borrowed.to_owned();
                let result = walker.transform_text(&mut owned);
                if result.is_ok() && owned != borrowed {
                    *self = Cow::Owned(owned);
                } else {
                    owned.zeroize();
                }
                result
            }
        }
    }
}

impl<T> Sealable for Option<T>
where
    T: Sealable,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        match self {
            Some(value) => value.transform_leaf(walker),
            None => Ok(()),
        }
    }
}

impl<T> Sealable for Box<T>
where
    T: Sealable + ?Sized,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        (**self).transform_leaf(walker)
    }
}

impl<T> Sealable for [T]
where
    T: Sealable,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (index, value) in self.iter_mut().enumerate() {
            walker.within(Segment::Index(index), |walker| value.transform_leaf(walker))?;
        }
        Ok(())
    }
}

impl<T> Sealable for Vec<T>
where
    T: Sealable,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        self.as_mut_slice().transform_leaf(walker)
    }
}

impl<K, V> Sealable for BTreeMap<K, V>
where
    K: Display,
    V: Sealable,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (key, value) in self.iter_mut() {
            walker.within(Segment::Key(key.to_string()), |walker| {
                value.transform_leaf(walker)
            })?;
        }
        Ok(())
    }
}

impl<K, V, S> Sealable for HashMap<K, V, S>
where
    K: Display,
    V: Sealable,
    S: BuildHasher,
{
    fn transform_leaf(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (key, value) in self.iter_mut() {
            walker.within(Segment::Key(key.to_string()), |walker| {
                value.transform_leaf(walker)
            })?;
        }
        Ok(())
    }
}

// =============================================================================
// Traversable implementations for standard library containers
// =============================================================================

impl<T> Traversable for Option<T>
where
    T: Traversable,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        match self {
            Some(value) => value.traverse(walker),
            None => Ok(()),
        }
    }
}

impl<T> Traversable for Box<T>
where
    T: Traversable + ?Sized,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        (**self).traverse(walker)
    }
}

impl<T> Traversable for [T]
where
    T: Traversable,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (index, value) in self.iter_mut().enumerate() {
            walker.within(Segment::Index(index), |walker| value.traverse(walker))?;
        }
        Ok(())
    }
}

impl<T> Traversable for Vec<T>
where
    T: Traversable,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        self.as_mut_slice().traverse(walker)
    }
}

impl<K, V> Traversable for BTreeMap<K, V>
where
    K: Display,
    V: Traversable,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (key, value) in self.iter_mut() {
            walker.within(Segment::Key(key.to_string()), |walker| value.traverse(walker))?;
        }
        Ok(())
    }
}

impl<K, V, S> Traversable for HashMap<K, V, S>
where
    K: Display,
    V: Traversable,
    S: BuildHasher,
{
    fn traverse(&mut self, walker: &mut Walker<'_>) -> Result<()> {
        for (key, value) in self.iter_mut() {
            walker.within(Segment::Key(key.to_string()), |walker| value.traverse(walker))?;
        }
        Ok(())
    }
}
