//! Derive macro for `piihide`.
//!
//! This crate generates the traversal code behind `#[derive(Pii)]`. It:
//! - reads `#[pii]` / `#[pii(nested)]` field attributes
//! - emits the `Entity` descriptor table and a `Traversable` impl that drives
//!   the walker over marked fields only
//! - emits a `Debug` impl that masks `#[pii]` fields
//!
//! It does **not** encrypt anything. Keys, ciphers and the walker itself live
//! in the main `piihide` crate and run at runtime.

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
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else,
    clippy::too_many_lines
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
mod types;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::add_bounds;
use transform::{label_for, DeriveContext};

/// Derives `piihide::Entity`, `piihide::Traversable` and a masking `Debug`
/// for structs and enums.
///
/// # Container Attributes
///
/// These attributes are placed on the struct/enum itself:
///
/// - `#[pii(skip_debug)]` - Opt out of `Debug` impl generation. Use this when you need a custom
///   `Debug` implementation or the type already derives `Debug` elsewhere.
/// - `#[pii(crate = "path::to::piihide")]` - Path to `piihide` when it is only reachable through
///   a re-export.
///
/// # Field Attributes
///
/// - **No annotation**: The field is never visited, whatever its type. Use this for ids,
///   timestamps and anything else that is not PII, including types that themselves contain PII
///   but should stay as they are in this context.
///
/// - `#[pii]`: The field is a sensitive leaf and is sealed/opened in place. Works for `String`,
///   `Option<String>`, `Vec<String>`, `Box<String>`, maps of strings and any local type that
///   implements `Sealable`. Scalars are rejected at compile time.
///
/// - `#[pii(nested)]`: The field holds another `Traversable` value (usually one that derives
///   `Pii`). It is walked, and its own markers decide what is sealed inside it. Wrappers such as
///   `Option`, `Vec` and `Box` are walked through.
///
/// Unions are rejected at compile time.
///
/// # Additional Generated Impls
///
/// - `Debug`: when *not* building with `cfg(any(test, feature = "testing"))`, `#[pii]` fields are
///   formatted as `[PII]` rather than their values. Use `#[pii(skip_debug)]` on the container to
///   opt out.
#[proc_macro_derive(Pii, attributes(pii))]
pub fn derive_pii(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the piihide crate root.
///
/// Handles crate renaming (e.g., `my_pii = { package = "piihide", ... }`)
/// and internal usage (when derive is used inside the piihide crate itself).
fn crate_root() -> TokenStream {
    match crate_name("piihide") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::piihide },
    }
}

/// Generated bodies for one type, consumed by [`expand`].
pub(crate) struct DeriveBodies {
    /// Statements run inside `Walker::entity` for a type with marked fields.
    pub(crate) traverse: TokenStream,
    pub(crate) debug_masked: TokenStream,
    pub(crate) debug_full: TokenStream,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions {
        skip_debug,
        crate_path,
    } = parse_container_options(&attrs)?;
    let root = crate_path.map_or_else(crate_root, |path| quote! { #path });

    let mut ctx = DeriveContext::new(&generics, &root);
    let bodies = match &data {
        Data::Struct(data) => derive_struct(&mut ctx, &ident, data)?,
        Data::Enum(data) => derive_enum(&mut ctx, data)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Pii` cannot be derived for unions",
            ));
        }
    };

    let traversal_generics = add_bounds(
        generics.clone(),
        &ctx.leaf_generics,
        &quote! { #root::Sealable },
    );
    let traversal_generics = add_bounds(
        traversal_generics,
        &ctx.nested_generics,
        &quote! { #root::Traversable },
    );
    let (impl_generics, ty_generics, where_clause) = traversal_generics.split_for_impl();

    let debug_bound = quote! { ::core::fmt::Debug };
    let masked_generics = add_bounds(generics.clone(), &ctx.masked_debug_generics, &debug_bound);
    let (masked_impl_generics, masked_ty_generics, masked_where_clause) =
        masked_generics.split_for_impl();
    let full_generics = add_bounds(generics.clone(), &ctx.full_debug_generics, &debug_bound);
    let (full_impl_generics, full_ty_generics, full_where_clause) = full_generics.split_for_impl();

    let type_name = label_for(&ident);
    let descriptors = &ctx.descriptors;
    let traverse = if ctx.sensitive {
        let body = &bodies.traverse;
        quote! {
            walker.entity::<Self, _>(|walker| {
                #body
                ::core::result::Result::Ok(())
            })
        }
    } else {
        quote! {
            walker.entity::<Self, _>(|_| ::core::result::Result::Ok(()))
        }
    };

    let debug_impl = if skip_debug {
        quote! {}
    } else {
        let debug_masked = &bodies.debug_masked;
        let debug_full = &bodies.debug_full;
        quote! {
            #[cfg(any(test, feature = "testing"))]
            impl #full_impl_generics ::core::fmt::Debug for #ident #full_ty_generics #full_where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_full
                }
            }

            #[cfg(not(any(test, feature = "testing")))]
            impl #masked_impl_generics ::core::fmt::Debug for #ident #masked_ty_generics #masked_where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_masked
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics #root::Entity for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const FIELDS: &'static [#root::FieldDescriptor] = &[#(#descriptors),*];
        }

        impl #impl_generics #root::Traversable for #ident #ty_generics #where_clause {
            fn traverse(&mut self, walker: &mut #root::Walker<'_>) -> #root::Result<()> {
                #traverse
            }
        }

        #debug_impl
    })
}
