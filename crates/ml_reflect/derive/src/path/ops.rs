use proc_macro2::TokenStream;
use quote::quote;

#[inline(always)]
pub(crate) fn struct_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::ops::Struct
    }
}

#[inline(always)]
pub(crate) fn reflect_ref_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::ops::ReflectRef
    }
}

#[inline(always)]
pub(crate) fn reflect_mut_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::ops::ReflectMut
    }
}
