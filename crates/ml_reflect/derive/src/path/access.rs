use proc_macro2::TokenStream;
use quote::quote;

#[inline(always)]
pub(crate) fn access_error_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::access::AccessError
    }
}

#[inline(always)]
pub(crate) fn expr_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::access::Expr
    }
}

#[inline(always)]
pub(crate) fn binary_op_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::access::BinaryOp
    }
}

#[inline(always)]
pub(crate) fn nav_expr_(ml_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ml_reflect_path::access::NavExpr
    }
}
