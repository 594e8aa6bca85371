//! Graph traversal and the public encrypt/decrypt entrypoints.
//!
//! This module ties the pieces together:
//!
//! - **`traversable`**: what can be walked (`Traversable`) and sealed (`Sealable`)
//! - **`walker`**: per-call state, path tracking and the leaf transform
//! - **`options`**: depth limit and preflight verification
//!
//! The walk is synchronous, depth-first and in place. It holds no references
//! beyond the call and reports the first error it meets.

mod options;
mod traversable;
mod walker;

use std::any::type_name;

use tracing::{debug, debug_span};

pub use options::{TraverseOptions, DEFAULT_MAX_DEPTH};
pub use traversable::{Sealable, Traversable};
pub use walker::{Direction, Walker};

use crate::{error::Result, key::KeyMaterial};

/// Runs encrypt/decrypt traversals with a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct Traverser {
    options: TraverseOptions,
}

impl Traverser {
    pub fn new(options: TraverseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TraverseOptions {
        &self.options
    }

    /// Seals every sensitive leaf reachable through marked fields.
    ///
    /// Every sensitive leaf must be plaintext; a sealed one aborts the walk
    /// with [`Error::AlreadySealed`](crate::Error::AlreadySealed).
    pub fn encrypt_in_place<T>(&self, root: &mut T, key: &KeyMaterial) -> Result<()>
    where
        T: Traversable + ?Sized,
    {
        self.run(root, key, Direction::Seal)
    }

    /// Opens every sensitive leaf reachable through marked fields.
    ///
    /// Every sensitive leaf must be sealed; a plaintext one aborts the walk
    /// with [`Error::NotSealed`](crate::Error::NotSealed).
    pub fn decrypt_in_place<T>(&self, root: &mut T, key: &KeyMaterial) -> Result<()>
    where
        T: Traversable + ?Sized,
    {
        self.run(root, key, Direction::Open)
    }

    fn run<T>(&self, root: &mut T, key: &KeyMaterial, direction: Direction) -> Result<()>
    where
        T: Traversable + ?Sized,
    {
        let _span = debug_span!("pii_traverse", root = type_name::<T>(), %direction).entered();

        if self.options.preflight {
            let mut verifier = Walker::new(key, direction, &self.options, true);
            if let Err(err) = root.traverse(&mut verifier) {
                debug!(error = %err, "preflight rejected graph");
                return Err(err);
            }
        }

        let mut walker = Walker::new(key, direction, &self.options, false);
        match root.traverse(&mut walker) {
            Ok(()) => {
                debug!(fields = walker.transformed(), "traversal complete");
                Ok(())
            }
            Err(err) => {
                debug!(
                    error = %err,
                    fields = walker.transformed(),
                    "traversal aborted"
                );
                Err(err)
            }
        }
    }
}

/// Seals every sensitive leaf of `root` in place with default options.
pub fn encrypt_in_place<T>(root: &mut T, key: &KeyMaterial) -> Result<()>
where
    T: Traversable + ?Sized,
{
    Traverser::default().encrypt_in_place(root, key)
}

/// Opens every sensitive leaf of `root` in place with default options.
pub fn decrypt_in_place<T>(root: &mut T, key: &KeyMaterial) -> Result<()>
where
    T: Traversable + ?Sized,
{
    Traverser::default().decrypt_in_place(root, key)
}

/// Method-style entrypoints for any [`Traversable`] value.
pub trait Protect: Traversable {
    /// Seals this value's PII in place. See [`encrypt_in_place`].
    fn encrypt_pii(&mut self, key: &KeyMaterial) -> Result<()> {
        encrypt_in_place(self, key)
    }

    /// Opens this value's PII in place. See [`decrypt_in_place`].
    fn decrypt_pii(&mut self, key: &KeyMaterial) -> Result<()> {
        decrypt_in_place(self, key)
    }
}

impl<T> Protect for T where T: Traversable + ?Sized {}

#[cfg(test)]
mod tests {
    use super::{Protect, TraverseOptions, Traverser};
    use crate::{cipher::SealedValue, Error, KeyMaterial, Pii};

    #[derive(Clone, PartialEq, Pii)]
    struct Account {
        #[pii]
        owner: String,
        #[pii]
        email: String,
        tier: String,
    }

    fn account() -> Account {
        Account {
            owner: "Bob Builder".into(),
            email: "bob@example.com".into(),
            tier: "gold".into(),
        }
    }

    #[test]
    fn protect_methods_round_trip() {
        let key = KeyMaterial::generate().unwrap();
        let mut value = account();
        value.encrypt_pii(&key).unwrap();
        assert!(SealedValue::is_sealed(&value.owner));
        assert_eq!(value.tier, "gold");
        value.decrypt_pii(&key).unwrap();
        assert!(value == account());
    }

    #[test]
    fn without_preflight_earlier_fields_stay_sealed() {
        let key = KeyMaterial::generate().unwrap();
        let mut value = account();
        value.email = "pii:v1:looks-sealed".into();

        let err = Traverser::default()
            .encrypt_in_place(&mut value, &key)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadySealed { .. }));
        assert!(SealedValue::is_sealed(&value.owner));
    }

    #[test]
    fn preflight_rejects_before_mutating() {
        let key = KeyMaterial::generate().unwrap();
        let mut value = account();
        value.email = "pii:v1:looks-sealed".into();

        let traverser = Traverser::new(TraverseOptions::default().with_preflight(true));
        let err = traverser.encrypt_in_place(&mut value, &key).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "email");
        assert_eq!(value.owner, "Bob Builder");
    }

    #[test]
    fn preflight_passes_uniform_graphs() {
        let key = KeyMaterial::generate().unwrap();
        let traverser = Traverser::new(TraverseOptions::default().with_preflight(true));
        let mut value = account();
        traverser.encrypt_in_place(&mut value, &key).unwrap();
        traverser.decrypt_in_place(&mut value, &key).unwrap();
        assert!(value == account());
    }
}
