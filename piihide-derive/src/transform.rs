//! Field lowering shared by struct and enum derivation.
//!
//! Every declared field becomes one `FieldDescriptor` in the type's `FIELDS`
//! table, plus code for three consumers:
//!
//! | Consumer | Plain | `#[pii]` | `#[pii(nested)]` |
//! |----------|-------|----------|------------------|
//! | `traverse` | not bound | `walker.leaf(..)` | `walker.nested(..)` |
//! | masked `Debug` | printed | `[PII]` | printed (own `Debug`) |
//! | full `Debug` | printed | printed | printed |
//!
//! Bindings are named `field_{index}` so user field names can never shadow the
//! generated `walker`, `f` or `debug` locals.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, Fields, LitStr, Result};

use crate::{
    generics::collect_generics_from_type,
    strategy::{parse_field_strategy, Strategy},
    types::is_scalar_type,
};

/// Accumulated state while lowering the fields of one type.
///
/// Enum variants share a single context so descriptor indices run across
/// variants in declaration order.
pub(crate) struct DeriveContext<'a> {
    generics: &'a syn::Generics,
    root: &'a TokenStream,
    pub(crate) descriptors: Vec<TokenStream>,
    pub(crate) sensitive: bool,
    pub(crate) leaf_generics: Vec<Ident>,
    pub(crate) nested_generics: Vec<Ident>,
    pub(crate) masked_debug_generics: Vec<Ident>,
    pub(crate) full_debug_generics: Vec<Ident>,
}

/// Patterns and statements for one struct body or enum variant.
pub(crate) struct LoweredFields {
    pub(crate) traverse_pattern: TokenStream,
    pub(crate) visits: Vec<TokenStream>,
    pub(crate) masked_pattern: TokenStream,
    pub(crate) masked_debug: TokenStream,
    pub(crate) full_pattern: TokenStream,
    pub(crate) full_debug: TokenStream,
}

/// One field after attribute parsing.
struct FieldPlan {
    member: Option<Ident>,
    binding: Ident,
    name: LitStr,
    strategy: Strategy,
}

impl<'a> DeriveContext<'a> {
    pub(crate) fn new(generics: &'a syn::Generics, root: &'a TokenStream) -> Self {
        Self {
            generics,
            root,
            descriptors: Vec::new(),
            sensitive: false,
            leaf_generics: Vec::new(),
            nested_generics: Vec::new(),
            masked_debug_generics: Vec::new(),
            full_debug_generics: Vec::new(),
        }
    }

    /// Lowers the fields of a struct (`variant == None`) or of one variant.
    ///
    /// `label` is what `Debug` prints: the type name for structs, the variant
    /// name for enums.
    pub(crate) fn lower_fields(
        &mut self,
        fields: &Fields,
        variant: Option<&LitStr>,
        label: &LitStr,
    ) -> Result<LoweredFields> {
        let root = self.root;
        let mut plans = Vec::new();
        let mut visits = Vec::new();

        for (position, field) in fields.iter().enumerate() {
            let strategy = parse_field_strategy(&field.attrs)?;
            let ty = &field.ty;
            let span = ty.span();

            if strategy.is_sensitive() && is_scalar_type(ty) {
                return Err(syn::Error::new(
                    span,
                    "scalar fields cannot be marked #[pii]: only string-like values are sealed. \
                    Leave the field unmarked or wrap it in a type that implements `Sealable`.",
                ));
            }

            let (member, name) = match &field.ident {
                Some(ident) => (
                    Some(ident.clone()),
                    LitStr::new(&ident.unraw().to_string(), ident.span()),
                ),
                None => (None, LitStr::new(&position.to_string(), field.span())),
            };
            let binding = format_ident!("field_{position}");

            let index = Literal::usize_unsuffixed(self.descriptors.len());
            let kind = match strategy {
                Strategy::Plain => quote! { #root::FieldKind::Plain },
                Strategy::Leaf => quote! { #root::FieldKind::Leaf },
                Strategy::Nested => quote! { #root::FieldKind::Nested },
            };
            self.descriptors.push(match variant {
                Some(variant) => {
                    quote! { #root::FieldDescriptor::in_variant(#variant, #name, #kind) }
                }
                None => quote! { #root::FieldDescriptor::new(#name, #kind) },
            });

            collect_generics_from_type(ty, self.generics, &mut self.full_debug_generics);
            match strategy {
                Strategy::Plain => {
                    collect_generics_from_type(ty, self.generics, &mut self.masked_debug_generics);
                }
                Strategy::Leaf => {
                    self.sensitive = true;
                    collect_generics_from_type(ty, self.generics, &mut self.leaf_generics);
                    visits.push(quote_spanned! { span =>
                        walker.leaf(&<Self as #root::Entity>::FIELDS[#index], #binding)?;
                    });
                }
                Strategy::Nested => {
                    self.sensitive = true;
                    collect_generics_from_type(ty, self.generics, &mut self.nested_generics);
                    collect_generics_from_type(ty, self.generics, &mut self.masked_debug_generics);
                    visits.push(quote_spanned! { span =>
                        walker.nested(&<Self as #root::Entity>::FIELDS[#index], #binding)?;
                    });
                }
            }

            plans.push(FieldPlan {
                member,
                binding,
                name,
                strategy,
            });
        }

        let traverse_pattern = pattern(fields, &plans, |plan| plan.strategy.is_sensitive());
        let masked_pattern = pattern(fields, &plans, |plan| plan.strategy != Strategy::Leaf);
        let full_pattern = pattern(fields, &plans, |_| true);

        let masked_debug = debug_body(fields, &plans, label, |plan| {
            let binding = &plan.binding;
            if plan.strategy == Strategy::Leaf {
                quote! { &::core::format_args!("{}", #root::PII_PLACEHOLDER) }
            } else {
                quote! { #binding }
            }
        });
        let full_debug = debug_body(fields, &plans, label, |plan| {
            let binding = &plan.binding;
            quote! { #binding }
        });

        Ok(LoweredFields {
            traverse_pattern,
            visits,
            masked_pattern,
            masked_debug,
            full_pattern,
            full_debug,
        })
    }
}

/// Builds a destructuring pattern, binding only the fields `bind` selects.
fn pattern(fields: &Fields, plans: &[FieldPlan], bind: impl Fn(&FieldPlan) -> bool) -> TokenStream {
    let parts = plans.iter().map(|plan| {
        let binding = if bind(plan) {
            let binding = &plan.binding;
            quote! { #binding }
        } else {
            quote! { _ }
        };
        match &plan.member {
            Some(member) => quote! { #member: #binding },
            None => binding,
        }
    });
    match fields {
        Fields::Named(_) => quote! { { #(#parts),* } },
        Fields::Unnamed(_) => quote! { ( #(#parts),* ) },
        Fields::Unit => quote! {},
    }
}

/// Builds a `Debug` body over the bindings of `pattern`.
fn debug_body(
    fields: &Fields,
    plans: &[FieldPlan],
    label: &LitStr,
    value: impl Fn(&FieldPlan) -> TokenStream,
) -> TokenStream {
    match fields {
        Fields::Named(_) => {
            let entries = plans.iter().map(|plan| {
                let name = &plan.name;
                let value = value(plan);
                quote! { debug.field(#name, #value); }
            });
            quote! {{
                let mut debug = f.debug_struct(#label);
                #(#entries)*
                debug.finish()
            }}
        }
        Fields::Unnamed(_) => {
            let entries = plans.iter().map(|plan| {
                let value = value(plan);
                quote! { debug.field(#value); }
            });
            quote! {{
                let mut debug = f.debug_tuple(#label);
                #(#entries)*
                debug.finish()
            }}
        }
        Fields::Unit => quote! { f.write_str(#label) },
    }
}

/// The string `Debug` and `TYPE_NAME` use for `ident`.
pub(crate) fn label_for(ident: &Ident) -> LitStr {
    LitStr::new(&ident.unraw().to_string(), ident.span())
}

