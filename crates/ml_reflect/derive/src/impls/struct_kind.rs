use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{PropertyDef, PropertyFn, ReflectStruct};
use crate::path::{
    access_error_, macro_exports_, member_info_, reflect_, struct_, struct_info_, type_info_,
};

/// Implement `Typed`, `Reflect` and `Struct` for a struct with named fields.
pub(crate) fn impl_struct(meta: &ReflectStruct) -> TokenStream {
    let type_info_tokens = type_info_tokens(meta);
    let typed_impl = super::trait_typed::impl_trait_typed(meta, type_info_tokens);
    let reflect_impl = super::trait_reflect::impl_trait_reflect(meta);
    let struct_impl = impl_trait_struct(meta);

    quote! {
        #typed_impl

        #reflect_impl

        #struct_impl
    }
}

/// `TypeInfo::Struct(StructInfo::new::<Self>([..]))`, fields first.
fn type_info_tokens(meta: &ReflectStruct) -> TokenStream {
    let ml_reflect_path = &meta.ml_reflect_path;
    let reflect_ = reflect_(ml_reflect_path);
    let type_info_ = type_info_(ml_reflect_path);
    let struct_info_ = struct_info_(ml_reflect_path);
    let member_info_ = member_info_(ml_reflect_path);

    let fields = meta.fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = ident.to_string();
        quote! {
            #member_info_::field::<Self, #ty>(
                #name,
                |this| <dyn #reflect_>::downcast_ref::<Self>(this)
                    .map(|host| &host.#ident as &dyn #reflect_),
                |this| <dyn #reflect_>::downcast_mut::<Self>(this)
                    .map(|host| &mut host.#ident as &mut dyn #reflect_),
            )
        }
    });

    let properties = meta
        .properties
        .iter()
        .map(|property| property_tokens(meta, property));

    quote! {
        #type_info_::Struct(#struct_info_::new::<Self>([
            #(#fields,)*
            #(#properties,)*
        ]))
    }
}

fn property_tokens(meta: &ReflectStruct, property: &PropertyDef) -> TokenStream {
    let ml_reflect_path = &meta.ml_reflect_path;
    let member_info_ = member_info_(ml_reflect_path);
    let exports_ = macro_exports_(ml_reflect_path);

    let name = &property.name;
    let ty = &property.ty;

    let get = match &property.get {
        PropertyFn::Plain(get) => quote! { |host| ::core::result::Result::Ok((#get)(host)) },
        PropertyFn::Fallible(get) => quote! { |host| (#get)(host) },
    };
    let set = match &property.set {
        None => quote! { ::core::option::Option::None },
        Some(set) => {
            let set = match set {
                PropertyFn::Plain(set) => quote! {
                    |host, value| {
                        (#set)(host, value);
                        ::core::result::Result::Ok(())
                    }
                },
                PropertyFn::Fallible(set) => quote! { |host, value| (#set)(host, value) },
            };
            quote! {
                ::core::option::Option::Some(|this, value| {
                    #exports_::property_set::<Self, #ty, _>(this, #name, value, #set)
                })
            }
        }
    };

    quote! {
        #member_info_::property::<Self, #ty>(
            #name,
            |this| #exports_::property_get::<Self, #ty, _>(this, #name, #get),
            #set,
        )
    }
}

/// By-name lookup, matching on the member name.
fn impl_trait_struct(meta: &ReflectStruct) -> TokenStream {
    let ml_reflect_path = &meta.ml_reflect_path;
    let reflect_ = reflect_(ml_reflect_path);
    let struct_ = struct_(ml_reflect_path);
    let access_error_ = access_error_(ml_reflect_path);
    let exports_ = macro_exports_(ml_reflect_path);

    let ident = meta.ident;
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    let field_idents = meta.fields.iter().map(|field| field.ident).collect::<Vec<_>>();
    let field_names = field_idents.iter().map(ToString::to_string).collect::<Vec<_>>();

    let member_names = meta.member_names().collect::<Vec<_>>();
    let member_indices = 0..member_names.len();
    let member_len = member_names.len();

    quote! {
        impl #impl_generics #struct_ for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn #reflect_> {
                match name {
                    #(#field_names => ::core::option::Option::Some(&self.#field_idents as &dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #reflect_> {
                match name {
                    #(#field_names => ::core::option::Option::Some(&mut self.#field_idents as &mut dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn property(
                &self,
                name: &str,
            ) -> ::core::option::Option<::core::result::Result<#exports_::Box<dyn #reflect_>, #access_error_>> {
                #exports_::struct_property(self, name)
            }

            #[inline]
            fn set_property(
                &mut self,
                name: &str,
                value: #exports_::Box<dyn #reflect_>,
            ) -> ::core::option::Option<::core::result::Result<(), #access_error_>> {
                #exports_::struct_set_property(self, name, value)
            }

            fn name_at(&self, index: usize) -> ::core::option::Option<&'static str> {
                match index {
                    #(#member_indices => ::core::option::Option::Some(#member_names),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn member_len(&self) -> usize {
                #member_len
            }
        }
    }
}
