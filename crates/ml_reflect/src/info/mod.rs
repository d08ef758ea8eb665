//! Static type information for reflected types.
//!
//! - [`Typed`]: types that expose a `'static` [`TypeInfo`].
//! - [`TypeInfo`]: the shape of a type: [`StructInfo`], [`OptionalInfo`] or [`OpaqueInfo`].
//! - [`MemberInfo`]: one field or property of a struct, including the
//!   functions that read and write it without a name lookup.

// -----------------------------------------------------------------------------
// Modules

mod member_info;
mod struct_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use member_info::{FieldAccess, MemberAccess, MemberInfo, MemberKind, PropertyAccess};
pub use member_info::{FieldGetFn, FieldGetMutFn, PropertyGetFn, PropertySetFn};
pub use struct_info::StructInfo;
pub use type_info::{OpaqueInfo, OptionalInfo, ReflectKind, Type, TypeInfo};
pub use typed::{DynamicTyped, Typed};
