//! Per-type sensitivity metadata.
//!
//! `#[derive(Pii)]` emits a constant descriptor table for each type
//! ([`Entity::FIELDS`]). The [`SensitivityRegistry`] turns that table into a
//! [`TypeModel`] the first time a type is described and caches it for the rest
//! of the process.
//!
//! ## Marker at every hop
//!
//! | Marker | `FieldKind` | Traversal |
//! |--------|-------------|-----------|
//! | None | `Plain` | never visited, whatever the field's type |
//! | `#[pii]` | `Leaf` | sealed / opened directly |
//! | `#[pii(nested)]` | `Nested` | walked; the child's own markers decide |
//!
//! A plain field that points at a type with sensitive fields is still skipped:
//! reachability is decided by explicit markers at each hop, never by the
//! transitive type structure.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use tracing::debug;

use crate::engine::Traversable;

/// How a field takes part in traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unmarked: never transformed, never walked.
    Plain,
    /// `#[pii]`: a string-like value sealed directly.
    Leaf,
    /// `#[pii(nested)]`: another traversable value to recurse into.
    Nested,
}

impl FieldKind {
    pub const fn is_sensitive(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Static description of one declared field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    name: &'static str,
    variant: Option<&'static str>,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            variant: None,
            kind,
        }
    }

    /// A field of an enum variant.
    pub const fn in_variant(variant: &'static str, name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            variant: Some(variant),
            kind,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn variant(&self) -> Option<&'static str> {
        self.variant
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    pub const fn is_sensitive(&self) -> bool {
        self.kind.is_sensitive()
    }
}

/// A type whose fields carry sensitivity markers.
///
/// Implemented by `#[derive(Pii)]`. `FIELDS` lists every declared field in
/// declaration order, plain ones included; for enums the variants' fields are
/// concatenated in variant order.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not describe its PII fields",
    label = "this type has no sensitivity model",
    note = "use `#[derive(Pii)]` on the type definition"
)]
pub trait Entity: Traversable {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    /// Returns `true` if any field is marked.
    fn has_sensitive_fields() -> bool {
        Self::FIELDS.iter().any(FieldDescriptor::is_sensitive)
    }
}

/// The cached sensitivity model of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeModel {
    type_name: &'static str,
    fields: &'static [FieldDescriptor],
    leaf_count: usize,
    nested_count: usize,
}

impl TypeModel {
    fn build<T: Entity>() -> Self {
        let count = |kind| T::FIELDS.iter().filter(|f| f.kind() == kind).count();
        Self {
            type_name: T::TYPE_NAME,
            fields: T::FIELDS,
            leaf_count: count(FieldKind::Leaf),
            nested_count: count(FieldKind::Nested),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn sensitive_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_sensitive())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn nested_count(&self) -> usize {
        self.nested_count
    }

    /// Returns `true` if no field is marked.
    pub fn is_plain(&self) -> bool {
        self.leaf_count == 0 && self.nested_count == 0
    }
}

/// Process-scoped cache of [`TypeModel`]s.
///
/// Models are built lazily on first use per type, never evicted, and safe to
/// populate from several threads at once: each type is built exactly once.
#[derive(Debug, Default)]
pub struct SensitivityRegistry {
    models: RwLock<HashMap<TypeId, Arc<TypeModel>>>,
}

impl SensitivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<SensitivityRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the model for `T`, building it on first request.
    pub fn describe<T: Entity + 'static>(&self) -> Arc<TypeModel> {
        let id = TypeId::of::<T>();
        if let Some(model) = self
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Arc::clone(model);
        }

        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        let model = models.entry(id).or_insert_with(|| {
            let model = TypeModel::build::<T>();
            debug!(
                type_name = model.type_name(),
                leaves = model.leaf_count(),
                nested = model.nested_count(),
                "registered sensitivity model"
            );
            Arc::new(model)
        });
        Arc::clone(model)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Describes `T` through the global registry.
pub fn describe<T: Entity + 'static>() -> Arc<TypeModel> {
    SensitivityRegistry::global().describe::<T>()
}
