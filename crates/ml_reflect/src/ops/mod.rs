//! Reflected shapes and their operations.
//!
//! [`Reflect::reflect_ref`] and [`Reflect::reflect_mut`] split a value into a
//! [`ReflectRef`] / [`ReflectMut`]; the [`Struct`] trait then gives by-name
//! access to its members.
//!
//! [`Reflect::reflect_ref`]: crate::Reflect::reflect_ref
//! [`Reflect::reflect_mut`]: crate::Reflect::reflect_mut

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use kind::{ReflectMut, ReflectRef};
pub use struct_ops::Struct;
