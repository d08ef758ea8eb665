//! This independent module is used to provide the required paths.
//! So as to minimize changes when the `ml_reflect` structure is modified.
//!
//! The only special feature is the path of ml_reflect itself,
//! See [`ml_reflect`] function doc.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `ml_reflect` crate.
///
/// Not all crates can reach the reflection crate through `ml_reflect`, so
/// the invoking crate's `Cargo.toml` is scanned:
///
/// 1. For crates that depend on `ml_reflect`, `::ml_reflect` is returned.
/// 2. For crates that depend on `member_lens`, `::member_lens::reflect` is returned.
/// 3. For other situations, `::ml_reflect` is returned, but this may be incorrect.
///
/// The cost of this function is relatively high (file access, a lock, a
/// lookup), so the path is obtained once per invocation and passed around.
pub(crate) fn ml_reflect() -> syn::Path {
    ml_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("ml_reflect"))
}

// -----------------------------------------------------------------------------
// Modules

mod access;
mod info;
mod ops;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use access::*;
pub(crate) use info::*;
pub(crate) use ops::*;

#[inline(always)]
pub(crate) fn macro_exports_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn reflect_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::Reflect
    }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::impls::NonGenericTypeInfoCell
    }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::impls::GenericTypeInfoCell
    }
}
