use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{StructInfo, Typed};

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`] plus a printable path.
///
/// Equality and hashing only consider the [`TypeId`].
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Creates the [`Type`] of `T`.
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full path, e.g. `alloc::string::String`.
    ///
    /// Only meant for diagnostics; the exact text is not stable across
    /// compiler versions.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the last segment of the path, without generics.
    ///
    /// ```
    /// # use ml_reflect::info::Type;
    /// assert_eq!(Type::of::<Option<String>>().ident(), "Option");
    /// assert_eq!(Type::of::<u32>().ident(), "u32");
    /// ```
    pub fn ident(&self) -> &'static str {
        let path = self.path;
        let end = path.find('<').unwrap_or(path.len());
        let path = &path[..end];
        match path.rfind("::") {
            Some(index) => &path[index + 2..],
            None => path,
        }
    }

    /// Check if the type is `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// ReflectKind

/// The coarse shape of a reflected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// A type with named members, see [`Struct`](crate::ops::Struct).
    Struct,
    /// `Option<T>`: a context that may be absent.
    Optional,
    /// A leaf value without reflected members.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectKind::Struct => f.write_str("Struct"),
            ReflectKind::Optional => f.write_str("Optional"),
            ReflectKind::Opaque => f.write_str("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Type info for values without reflected members (numbers, strings, ...).
#[derive(Debug, Clone)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    /// Creates the info of `T`.
    #[inline]
    pub fn new<T: Any>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    /// Returns the described [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Type info for `Option<T>`.
#[derive(Debug, Clone)]
pub struct OptionalInfo {
    ty: Type,
    some: Type,
    // `TypeInfo` is created on first access; using a function pointer delays it.
    some_info: fn() -> &'static TypeInfo,
}

impl OptionalInfo {
    /// Creates the info of `Option<T>`.
    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            some: Type::of::<T>(),
            some_info: T::type_info,
        }
    }

    /// Returns the described [`Type`], i.e. `Option<T>`.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the [`Type`] of `T`.
    #[inline]
    pub const fn some_ty(&self) -> &Type {
        &self.some
    }

    /// Returns the [`TypeInfo`] of `T`.
    #[inline]
    pub fn some_info(&self) -> &'static TypeInfo {
        (self.some_info)()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information for a reflected type.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Struct(StructInfo),
    Optional(OptionalInfo),
    Opaque(OpaqueInfo),
}

impl TypeInfo {
    /// Returns the described [`Type`].
    #[inline]
    pub fn ty(&self) -> &Type {
        match self {
            TypeInfo::Struct(info) => info.ty(),
            TypeInfo::Optional(info) => info.ty(),
            TypeInfo::Opaque(info) => info.ty(),
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    /// Returns the path of the described type.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    /// Check if the described type is `T`.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Returns the [`ReflectKind`].
    #[inline]
    pub fn kind(&self) -> ReflectKind {
        match self {
            TypeInfo::Struct(_) => ReflectKind::Struct,
            TypeInfo::Optional(_) => ReflectKind::Optional,
            TypeInfo::Opaque(_) => ReflectKind::Opaque,
        }
    }

    /// Returns the [`StructInfo`] if the type is a struct.
    #[inline]
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            TypeInfo::Struct(info) => Some(info),
            _ => None,
        }
    }

    /// Strips every `Option` layer and returns the info of the value a
    /// member lookup would run on.
    ///
    /// ```
    /// # use ml_reflect::info::{Typed, ReflectKind};
    /// let info = <Option<Option<u8>>>::type_info();
    /// assert_eq!(info.kind(), ReflectKind::Optional);
    /// assert!(info.context().type_is::<u8>());
    /// ```
    pub fn context(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let TypeInfo::Optional(optional) = info {
            info = optional.some_info();
        }
        info
    }
}
