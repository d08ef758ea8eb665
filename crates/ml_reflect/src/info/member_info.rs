use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Reflect;
use crate::access::AccessError;
use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Access functions

/// Reads a field of the receiver. `None` if the receiver is not the declaring type.
pub type FieldGetFn = fn(&dyn Reflect) -> Option<&dyn Reflect>;

/// Mutably borrows a field of the receiver. `None` if the receiver is not the declaring type.
pub type FieldGetMutFn = fn(&mut dyn Reflect) -> Option<&mut dyn Reflect>;

/// Runs a property getter on the receiver.
pub type PropertyGetFn = fn(&dyn Reflect) -> Result<Box<dyn Reflect>, AccessError>;

/// Runs a property setter on the receiver.
pub type PropertySetFn = fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), AccessError>;

// -----------------------------------------------------------------------------
// MemberKind

/// Whether a member is stored in place or computed by accessor functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    /// A struct field: addressable, can be borrowed and written in place.
    Field,
    /// A getter (and optional setter) pair: produces an owned value.
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => f.write_str("field"),
            MemberKind::Property => f.write_str("property"),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberAccess

/// Borrowing accessors of a field.
#[derive(Clone, Copy)]
pub struct FieldAccess {
    pub get: FieldGetFn,
    pub get_mut: FieldGetMutFn,
}

/// Getter and optional setter of a property.
#[derive(Clone, Copy)]
pub struct PropertyAccess {
    pub get: PropertyGetFn,
    /// `None` for read-only properties.
    pub set: Option<PropertySetFn>,
}

/// The generated access functions of a member.
#[derive(Clone, Copy)]
pub enum MemberAccess {
    Field(FieldAccess),
    Property(PropertyAccess),
}

impl MemberAccess {
    /// Returns the [`MemberKind`].
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        match self {
            MemberAccess::Field(_) => MemberKind::Field,
            MemberAccess::Property(_) => MemberKind::Property,
        }
    }
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberAccess::Field(_) => f.write_str("Field"),
            MemberAccess::Property(access) => f
                .debug_struct("Property")
                .field("settable", &access.set.is_some())
                .finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberInfo

/// Static information about one member of a struct.
///
/// Besides the name and types, a member carries the functions generated by
/// `#[derive(Reflect)]` that reach it directly, without matching on its name.
#[derive(Clone)]
pub struct MemberInfo {
    name: &'static str,
    declaring: Type,
    value: Type,
    // `TypeInfo` is created on first access; using a function pointer delays it.
    value_info: fn() -> &'static TypeInfo,
    access: MemberAccess,
}

impl MemberInfo {
    /// Creates a field member of `S` holding a `V`.
    #[inline]
    pub fn field<S: Any, V: Typed>(
        name: &'static str,
        get: FieldGetFn,
        get_mut: FieldGetMutFn,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<S>(),
            value: Type::of::<V>(),
            value_info: V::type_info,
            access: MemberAccess::Field(FieldAccess { get, get_mut }),
        }
    }

    /// Creates a property member of `S` producing a `V`.
    #[inline]
    pub fn property<S: Any, V: Typed>(
        name: &'static str,
        get: PropertyGetFn,
        set: Option<PropertySetFn>,
    ) -> Self {
        Self {
            name,
            declaring: Type::of::<S>(),
            value: Type::of::<V>(),
            value_info: V::type_info,
            access: MemberAccess::Property(PropertyAccess { get, set }),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.access.kind()
    }

    /// The struct this member belongs to.
    #[inline]
    pub const fn declaring_type(&self) -> &Type {
        &self.declaring
    }

    /// The type of the member's value.
    #[inline]
    pub const fn value_type(&self) -> &Type {
        &self.value
    }

    /// The [`TypeInfo`] of the member's value.
    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    #[inline]
    pub const fn access(&self) -> &MemberAccess {
        &self.access
    }

    /// Returns `false` for read-only properties.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        match &self.access {
            MemberAccess::Field(_) => true,
            MemberAccess::Property(access) => access.set.is_some(),
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("declaring", &self.declaring)
            .field("value", &self.value)
            .field("access", &self.access)
            .finish()
    }
}
