use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::Struct;

/// An immutable enumeration of the reflected shapes.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    /// The content of an `Option<T>`.
    Optional(Option<&'a dyn Reflect>),
    Opaque(&'a dyn Reflect),
}

/// A mutable enumeration of the reflected shapes.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    /// The content of an `Option<T>`.
    Optional(Option<&'a mut dyn Reflect>),
    Opaque(&'a mut dyn Reflect),
}

impl ReflectRef<'_> {
    #[inline]
    pub fn kind(&self) -> ReflectKind {
        match self {
            ReflectRef::Struct(_) => ReflectKind::Struct,
            ReflectRef::Optional(_) => ReflectKind::Optional,
            ReflectRef::Opaque(_) => ReflectKind::Opaque,
        }
    }
}

impl ReflectMut<'_> {
    #[inline]
    pub fn kind(&self) -> ReflectKind {
        match self {
            ReflectMut::Struct(_) => ReflectKind::Struct,
            ReflectMut::Optional(_) => ReflectKind::Optional,
            ReflectMut::Opaque(_) => ReflectKind::Opaque,
        }
    }
}
