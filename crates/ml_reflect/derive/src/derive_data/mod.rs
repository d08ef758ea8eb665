//! The parsed form of a `#[derive(Reflect)]` input.

mod attributes;

pub(crate) use attributes::{PropertyFn, PropertyDef};

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Type};

/// A reflected field.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
}

/// Everything the impl generators need to know about the input struct.
pub(crate) struct ReflectStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub fields: Vec<StructField<'a>>,
    pub properties: Vec<PropertyDef>,
    pub ml_reflect_path: syn::Path,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => Some(&fields.named),
                Fields::Unit => None,
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new(
                        fields.span(),
                        "`Reflect` can only be derived for structs with named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Reflect` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Reflect` cannot be derived for unions",
                ));
            }
        };

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "reflected types must be 'static, lifetime parameters are not supported",
            ));
        }

        let mut fields = Vec::new();
        for field in named.into_iter().flatten() {
            if attributes::is_ignored(&field.attrs)? {
                continue;
            }
            // Named fields always carry an ident.
            let Some(ident) = &field.ident else { continue };
            fields.push(StructField {
                ident,
                ty: &field.ty,
            });
        }

        let properties = attributes::parse_properties(&ast.attrs)?;
        for property in &properties {
            let name = property.name.value();
            let taken = fields.iter().any(|field| *field.ident == name)
                || properties
                    .iter()
                    .filter(|other| other.name.value() == name)
                    .count()
                    > 1;
            if taken {
                return Err(syn::Error::new(
                    property.name.span(),
                    format!("duplicate member name `{name}`"),
                ));
            }
        }

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            fields,
            properties,
            ml_reflect_path: crate::path::ml_reflect(),
        })
    }

    /// Generic types store their info in a `GenericTypeInfoCell`.
    pub fn impl_with_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    pub fn member_names(&self) -> impl Iterator<Item = String> + '_ {
        self.fields
            .iter()
            .map(|field| field.ident.to_string())
            .chain(self.properties.iter().map(|property| property.name.value()))
    }

    /// Splits the generics the way [`Generics::split_for_impl`] does, adding
    /// the bounds every reflected type parameter needs.
    pub fn split_generics(
        &self,
    ) -> (
        syn::ImplGenerics<'_>,
        syn::TypeGenerics<'_>,
        proc_macro2::TokenStream,
    ) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let reflect_ = crate::path::reflect_(&self.ml_reflect_path);
        let typed_ = crate::path::typed_(&self.ml_reflect_path);

        let params = self.generics.type_params().map(|param| &param.ident);
        let predicates = where_clause.map(|clause| &clause.predicates);
        let where_tokens = quote::quote! {
            where
                #(#params: #reflect_ + #typed_,)*
                #predicates
        };
        (impl_generics, ty_generics, where_tokens)
    }
}
