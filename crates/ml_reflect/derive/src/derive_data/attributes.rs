use syn::spanned::Spanned;
use syn::{Attribute, Expr, LitStr, Type};

use crate::REFLECT_ATTRIBUTE_NAME;

/// One side of a property: infallible or returning `Result<_, MemberError>`.
pub(crate) enum PropertyFn {
    Plain(Expr),
    Fallible(Expr),
}

/// `#[reflect(property(name = "..", ty = T, get = f, set = g))]`
pub(crate) struct PropertyDef {
    pub name: LitStr,
    pub ty: Type,
    pub get: PropertyFn,
    pub set: Option<PropertyFn>,
}

fn reflect_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME))
}

/// `#[reflect(ignore)]` on a field.
pub(crate) fn is_ignored(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut ignored = false;
    for attr in reflect_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                ignored = true;
                Ok(())
            } else {
                Err(meta.error("unknown field attribute, expected `ignore`"))
            }
        })?;
    }
    Ok(ignored)
}

/// All `property(..)` entries of the type-level `#[reflect(..)]` attributes.
pub(crate) fn parse_properties(attrs: &[Attribute]) -> syn::Result<Vec<PropertyDef>> {
    let mut properties = Vec::new();
    for attr in reflect_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("property") {
                return Err(meta.error("unknown type attribute, expected `property(..)`"));
            }
            let span = meta.path.span();

            let mut name: Option<LitStr> = None;
            let mut ty: Option<Type> = None;
            let mut get: Option<PropertyFn> = None;
            let mut set: Option<PropertyFn> = None;

            meta.parse_nested_meta(|inner| {
                let key = inner
                    .path
                    .get_ident()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let slot_taken = match key.as_str() {
                    "name" => name.replace(inner.value()?.parse()?).is_some(),
                    "ty" => ty.replace(inner.value()?.parse()?).is_some(),
                    "get" => get
                        .replace(PropertyFn::Plain(inner.value()?.parse()?))
                        .is_some(),
                    "try_get" => get
                        .replace(PropertyFn::Fallible(inner.value()?.parse()?))
                        .is_some(),
                    "set" => set
                        .replace(PropertyFn::Plain(inner.value()?.parse()?))
                        .is_some(),
                    "try_set" => set
                        .replace(PropertyFn::Fallible(inner.value()?.parse()?))
                        .is_some(),
                    _ => {
                        return Err(inner.error(
                            "unknown property key, expected `name`, `ty`, `get`, `try_get`, `set` or `try_set`",
                        ));
                    }
                };
                if slot_taken {
                    return Err(inner.error(format!("`{key}` is given more than once")));
                }
                Ok(())
            })?;

            let missing = |key: &str| syn::Error::new(span, format!("property is missing `{key}`"));
            let name = name.ok_or_else(|| missing("name"))?;
            if name.value().is_empty() {
                return Err(syn::Error::new(name.span(), "property name must not be empty"));
            }
            properties.push(PropertyDef {
                name,
                ty: ty.ok_or_else(|| missing("ty"))?,
                get: get.ok_or_else(|| missing("get"))?,
                set,
            });
            Ok(())
        })?;
    }
    Ok(properties)
}
