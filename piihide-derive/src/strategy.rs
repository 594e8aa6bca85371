//! Parsing of `#[pii(...)]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Meta, Result};

/// Field transformation strategy based on `#[pii(...)]` attributes.
///
/// ## Strategy Mapping
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Plain` | Field is never visited |
/// | `#[pii]` | `Leaf` | Seal/open the string-like value |
/// | `#[pii(nested)]` | `Nested` | Walk into the value's own markers |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// No annotation.
    ///
    /// External types like `DateTime<Utc>` work without implementing anything.
    Plain,
    /// Bare `#[pii]`: the value must implement `Sealable`.
    Leaf,
    /// `#[pii(nested)]`: the value must implement `Traversable`.
    Nested,
}

impl Strategy {
    pub(crate) fn is_sensitive(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[pii] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("pii") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                set_strategy(&mut strategy, Strategy::Leaf, attr.span())?;
            }
            Meta::List(list) => {
                let mut nested = false;
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("nested") {
                        nested = true;
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown field option `{}`; expected `nested`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
                let next = if nested {
                    Strategy::Nested
                } else {
                    Strategy::Leaf
                };
                set_strategy(&mut strategy, next, attr.span())?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[pii]",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::Plain))
}
