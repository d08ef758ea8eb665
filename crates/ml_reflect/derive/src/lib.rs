//! See following macros:
//!
//! - [`Reflect`]
//! - [`nav!`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, ExprClosure, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod nav;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Struct Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits for a struct with
/// named fields (or a unit struct):
///
/// - `Typed`: a `StructInfo` listing every member together with the
///   functions that read and write it directly.
/// - `Reflect`
/// - `Struct`: by-name member lookup.
///
/// Enums, tuple structs and types with lifetime parameters are rejected.
/// Type parameters receive a `Reflect + Typed` bound.
///
/// ## Fields
///
/// Every named field becomes a field member. Its type must implement
/// `Reflect` and `Typed`. Skip a field with `ignore`:
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Foo {
///     a: u32,
///     #[reflect(ignore)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// ## Properties
///
/// A property is a member computed by functions instead of stored in place.
/// Declare it at type level:
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(property(name = "full_name", ty = String, get = Person::full_name))]
/// #[reflect(property(name = "age", ty = u32, get = Person::age, try_set = Person::set_age))]
/// struct Person { first: String, last: String, born: u32 }
/// ```
///
/// - `get = f`: `fn(&Self) -> T`; or `try_get = f`: `fn(&Self) -> Result<T, MemberError>`.
/// - `set = f`: `fn(&mut Self, T)`; or `try_set = f`: `fn(&mut Self, T) -> Result<(), MemberError>`.
///
/// The setter is optional; without it the property is read-only.
/// Any expression callable like a function is accepted, closures included.
///
/// Member names must be unique across fields and properties.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectStruct::from_input(&ast) {
        Ok(meta) => impls::impl_struct(&meta).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Navigation Expressions
///
/// Captures a closure as a `NavExpr<T, V>` instead of compiling it.
///
/// ```rust, ignore
/// let expr = nav!(|c: Customer| -> String { c.address.city });
/// assert_eq!(expr.to_string(), "c => c.address.city");
/// ```
///
/// The parameter type gives `T` and the return type gives `V`; either may be
/// left out and inferred. The closure takes exactly one parameter.
///
/// The body is recorded as written: member accesses, method calls,
/// indexing, literals, binary operators and assignments are kept as tree
/// nodes, anything else as opaque source text. Rejecting what is not a
/// member chain is left to `resolve`, so the macro never refuses a body.
#[proc_macro]
pub fn nav(input: TokenStream) -> TokenStream {
    let closure = parse_macro_input!(input as ExprClosure);

    match nav::impl_nav(&closure) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
