//! Struct-specific `Pii` derivation.
//!
//! Named, tuple and unit structs all lower to a single `match self` arm; unit
//! structs have no fields and so never reach the walker.

use proc_macro2::Ident;
use quote::quote;
use syn::{DataStruct, Result};

use crate::{
    transform::{label_for, DeriveContext, LoweredFields},
    DeriveBodies,
};

pub(crate) fn derive_struct(
    ctx: &mut DeriveContext<'_>,
    name: &Ident,
    data: &DataStruct,
) -> Result<DeriveBodies> {
    let label = label_for(name);
    let LoweredFields {
        traverse_pattern,
        visits,
        masked_pattern,
        masked_debug,
        full_pattern,
        full_debug,
    } = ctx.lower_fields(&data.fields, None, &label)?;

    Ok(DeriveBodies {
        traverse: quote! {
            match self {
                Self #traverse_pattern => {
                    #(#visits)*
                }
            }
        },
        debug_masked: quote! {
            match self {
                Self #masked_pattern => #masked_debug,
            }
        },
        debug_full: quote! {
            match self {
                Self #full_pattern => #full_debug,
            }
        },
    })
}
