//! Enum-specific `Pii` derivation.
//!
//! Each variant becomes one match arm. Only the active variant's fields are
//! visited, and descriptors are tagged with their variant name so a type model
//! can tell `Contact::Email.0` apart from `Contact::Phone.0`.

use quote::quote;
use syn::{DataEnum, Result};

use crate::{
    transform::{label_for, DeriveContext, LoweredFields},
    DeriveBodies,
};

pub(crate) fn derive_enum(
    ctx: &mut DeriveContext<'_>,
    data: &DataEnum,
) -> Result<DeriveBodies> {
    if data.variants.is_empty() {
        return Ok(DeriveBodies {
            traverse: quote! { match *self {} },
            debug_masked: quote! { match *self {} },
            debug_full: quote! { match *self {} },
        });
    }

    let mut traverse_arms = Vec::new();
    let mut masked_arms = Vec::new();
    let mut full_arms = Vec::new();

    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let label = label_for(variant_ident);
        let LoweredFields {
            traverse_pattern,
            visits,
            masked_pattern,
            masked_debug,
            full_pattern,
            full_debug,
        } = ctx.lower_fields(&variant.fields, Some(&label), &label)?;

        traverse_arms.push(quote! {
            Self::#variant_ident #traverse_pattern => {
                #(#visits)*
            }
        });
        masked_arms.push(quote! {
            Self::#variant_ident #masked_pattern => #masked_debug,
        });
        full_arms.push(quote! {
            Self::#variant_ident #full_pattern => #full_debug,
        });
    }

    Ok(DeriveBodies {
        traverse: quote! {
            match self {
                #(#traverse_arms)*
            }
        },
        debug_masked: quote! {
            match self {
                #(#masked_arms)*
            }
        },
        debug_full: quote! {
            match self {
                #(#full_arms)*
            }
        },
    })
}
