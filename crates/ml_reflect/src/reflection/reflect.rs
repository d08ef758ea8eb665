use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::{DynamicTyped, ReflectKind};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait for runtime member access.
///
/// A `dyn Reflect` can report its type info, be downcast to its concrete
/// type, and be split by [`reflect_ref`]/[`reflect_mut`] into one of the
/// reflected shapes:
///
/// - [`Struct`]: named fields and properties, looked up by name.
/// - `Optional`: an `Option<T>`, i.e. a context that may be absent.
/// - `Opaque`: a leaf value.
///
/// # Implementation
///
/// Use `#[derive(Reflect)]` for structs; opaque leaf types are covered for
/// the primitives, `String`, `Vec<T>` and `Option<T>`.
///
/// ```
/// use ml_reflect::{Reflect, derive::Reflect, ops::ReflectRef};
///
/// #[derive(Reflect)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let ReflectRef::Struct(value) = point.reflect_ref() else { unreachable!() };
/// let y = value.field("y").unwrap().downcast_ref::<i32>().unwrap();
/// assert_eq!(*y, 2);
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [`Struct`]: crate::ops::Struct
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    /// Casts this type to a reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a mutable reflected value.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as a reflected value.
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the concrete type.
    ///
    /// Unlike [`Any::type_id`] on a `Box<dyn Reflect>`, this never reports
    /// the container.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the [`ReflectKind`] of this value.
    fn reflect_kind(&self) -> ReflectKind;

    /// Returns an immutable enumeration of the reflected shape.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable enumeration of the reflected shape.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Check if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Takes the value out of the box if it is a `T`; otherwise hands the box back.
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("the type was checked by `is`"),
        }
    }

    /// Returns the path of the concrete type, for diagnostics.
    #[inline]
    pub fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect({})", self.reflect_type_path())
    }
}
