//! Items used by the code that `#[derive(Reflect)]` and `nav!` generate.
//!
//! Not public API.

pub use alloc::boxed::Box;

use crate::Reflect;
use crate::access::{AccessError, MemberError};
use crate::info::{MemberAccess, Typed};

/// Runs a property getter on `this` if it is an `S`.
#[inline]
pub fn property_get<S, V, F>(
    this: &dyn Reflect,
    name: &'static str,
    get: F,
) -> Result<Box<dyn Reflect>, AccessError>
where
    S: Reflect,
    V: Reflect,
    F: FnOnce(&S) -> Result<V, MemberError>,
{
    let Some(host) = this.downcast_ref::<S>() else {
        return Err(AccessError::MemberNotFound {
            type_path: this.reflect_type_path(),
            member: name,
        });
    };
    get(host)
        .map(|value| Box::new(value) as Box<dyn Reflect>)
        .map_err(AccessError::Member)
}

/// Runs a property setter on `this` if it is an `S` and `value` is a `V`.
#[inline]
pub fn property_set<S, V, F>(
    this: &mut dyn Reflect,
    name: &'static str,
    value: Box<dyn Reflect>,
    set: F,
) -> Result<(), AccessError>
where
    S: Reflect,
    V: Reflect + Typed,
    F: FnOnce(&mut S, V) -> Result<(), MemberError>,
{
    let type_path = this.reflect_type_path();
    let Some(host) = this.downcast_mut::<S>() else {
        return Err(AccessError::MemberNotFound {
            type_path,
            member: name,
        });
    };
    let value = value.take::<V>().map_err(|value| AccessError::TypeMismatch {
        expected: V::type_info().type_path(),
        found: value.reflect_type_path(),
    })?;
    set(host, value).map_err(AccessError::Member)
}

/// `Struct::property` through the member table of `S`.
#[inline]
pub fn struct_property<S: Reflect + Typed>(
    this: &S,
    name: &str,
) -> Option<Result<Box<dyn Reflect>, AccessError>> {
    match S::type_info().as_struct()?.member(name)?.access() {
        MemberAccess::Property(property) => Some((property.get)(this)),
        MemberAccess::Field(_) => None,
    }
}

/// `Struct::set_property` through the member table of `S`.
#[inline]
pub fn struct_set_property<S: Reflect + Typed>(
    this: &mut S,
    name: &str,
    value: Box<dyn Reflect>,
) -> Option<Result<(), AccessError>> {
    match S::type_info().as_struct()?.member(name)?.access() {
        MemberAccess::Property(property) => Some((property.set?)(this, value)),
        MemberAccess::Field(_) => None,
    }
}
