use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;
use crate::path::{reflect_, reflect_kind_, reflect_mut_, reflect_ref_};

/// Generate the `Reflect` impl of a struct.
pub(crate) fn impl_trait_reflect(meta: &ReflectStruct) -> TokenStream {
    let ml_reflect_path = &meta.ml_reflect_path;
    let reflect_ = reflect_(ml_reflect_path);
    let reflect_kind_ = reflect_kind_(ml_reflect_path);
    let reflect_ref_ = reflect_ref_(ml_reflect_path);
    let reflect_mut_ = reflect_mut_(ml_reflect_path);

    let ident = meta.ident;
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::Struct
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Struct(self)
            }
        }
    }
}
