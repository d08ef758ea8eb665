use proc_macro2::TokenStream;
use quote::quote;

#[inline(always)]
pub(crate) fn typed_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::info::Typed
    }
}

#[inline(always)]
pub(crate) fn type_info_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::info::TypeInfo
    }
}

#[inline(always)]
pub(crate) fn struct_info_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::info::StructInfo
    }
}

#[inline(always)]
pub(crate) fn member_info_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::info::MemberInfo
    }
}

#[inline(always)]
pub(crate) fn reflect_kind_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::info::ReflectKind
    }
}
