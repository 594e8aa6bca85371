//! The per-call traversal state handed to [`Traversable`](super::Traversable)
//! implementations.
//!
//! Generated code drives the walker with three calls:
//!
//! - [`Walker::entity`] around each derived value (depth guard, tracing),
//! - [`Walker::leaf`] for `#[pii]` fields,
//! - [`Walker::nested`] for `#[pii(nested)]` fields.
//!
//! Plain fields never reach the walker.

use std::{fmt, mem};

use tracing::trace;
use zeroize::Zeroize;

use super::{
    options::TraverseOptions,
    traversable::{Sealable, Traversable},
};
use crate::{
    cipher::{self, SealedValue},
    error::{Error, Result},
    key::KeyMaterial,
    model::{Entity, FieldDescriptor},
    path::{FieldPath, Segment},
};

/// Which way sensitive leaves are transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Plaintext → sealed.
    Seal,
    /// Sealed → plaintext.
    Open,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seal => "seal",
            Self::Open => "open",
        })
    }
}

/// Traversal state for one `encrypt_in_place` / `decrypt_in_place` call.
///
/// With `verify_only` set the walker checks every sensitive leaf against the
/// expected state without writing anything back.
pub struct Walker<'a> {
    key: &'a KeyMaterial,
    direction: Direction,
    options: &'a TraverseOptions,
    verify_only: bool,
    path: FieldPath,
    depth: usize,
    transformed: usize,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        key: &'a KeyMaterial,
        direction: Direction,
        options: &'a TraverseOptions,
        verify_only: bool,
    ) -> Self {
        Self {
            key,
            direction,
            options,
            verify_only,
            path: FieldPath::root(),
            depth: 0,
            transformed: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Path of the value currently being visited.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Number of leaves transformed (or verified) so far.
    pub fn transformed(&self) -> usize {
        self.transformed
    }

    /// Visits one derived value: `Visiting` for the duration of `body`, `Done`
    /// once it returns.
    ///
    /// Types without any marked field are skipped without running `body`.
    pub fn entity<E, F>(&mut self, body: F) -> Result<()>
    where
        E: Entity,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if !E::has_sensitive_fields() {
            return Ok(());
        }
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: self.path.clone(),
                limit: self.options.max_depth,
            });
        }

        self.depth += 1;
        trace!(entity = E::TYPE_NAME, path = %self.path, depth = self.depth, "visiting");
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Transforms a `#[pii]` field.
    pub fn leaf<S>(&mut self, field: &FieldDescriptor, value: &mut S) -> Result<()>
    where
        S: Sealable + ?Sized,
    {
        self.within(Segment::Field(field.name()), |walker| {
            value.transform_leaf(walker)
        })
    }

    /// Recurses into a `#[pii(nested)]` field.
    pub fn nested<N>(&mut self, field: &FieldDescriptor, value: &mut N) -> Result<()>
    where
        N: Traversable + ?Sized,
    {
        self.within(Segment::Field(field.name()), |walker| value.traverse(walker))
    }

    /// Runs `f` with `segment` appended to the current path.
    pub fn within<R, F>(&mut self, segment: Segment, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Seals or opens a single string in place.
    ///
    /// Sealing refuses values that already carry the sealed prefix; opening
    /// refuses values that do not. The replaced plaintext is zeroized.
    pub fn transform_text(&mut self, value: &mut String) -> Result<()> {
        match self.direction {
            Direction::Seal => {
                if SealedValue::is_sealed(value) {
                    return Err(Error::AlreadySealed {
                        path: self.path.clone(),
                    });
                }
                if !self.verify_only {
                    let sealed =
                        cipher::seal(value, self.key).map_err(|e| Error::at(e, &self.path))?;
                    let mut plaintext = mem::replace(value, sealed.into_string());
                    plaintext.zeroize();
                }
            }
            Direction::Open => {
                if !SealedValue::is_sealed(value) {
                    return Err(Error::NotSealed {
                        path: self.path.clone(),
                    });
                }
                let sealed = SealedValue::parse(value).map_err(|e| Error::at(e, &self.path))?;
                if !self.verify_only {
                    *value = cipher::open(&sealed, self.key).map_err(|e| Error::at(e, &self.path))?;
                }
            }
        }

        self.transformed += 1;
        trace!(path = %self.path, direction = %self.direction, "leaf transformed");
        Ok(())
    }
}

impl fmt::Debug for Walker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("direction", &self.direction)
            .field("verify_only", &self.verify_only)
            .field("path", &self.path)
            .field("depth", &self.depth)
            .field("transformed", &self.transformed)
            .finish_non_exhaustive()
    }
}
