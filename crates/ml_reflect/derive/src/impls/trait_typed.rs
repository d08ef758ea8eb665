use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;
use crate::path::{generic_type_info_cell_, non_generic_type_info_cell_, type_info_, typed_};

/// Generate the `Typed` impl; the info is stored in a static cell.
pub(crate) fn impl_trait_typed(meta: &ReflectStruct, type_info_tokens: TokenStream) -> TokenStream {
    let ml_reflect_path = &meta.ml_reflect_path;
    let typed_ = typed_(ml_reflect_path);
    let type_info_ = type_info_(ml_reflect_path);

    let ident = meta.ident;
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    let body = if meta.impl_with_generic() {
        let cell_ = generic_type_info_cell_(ml_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| { #type_info_tokens })
        }
    } else {
        let cell_ = non_generic_type_info_cell_(ml_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| { #type_info_tokens })
        }
    };

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}
