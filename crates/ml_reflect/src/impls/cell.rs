//! Containers for static storage of type information.
//!
//! ## NonGenericTypeInfoCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional
//! expenses.
//!
//! ## GenericTypeInfoCell
//!
//! If the type is generic, the `static CELL` inside `type_info` is shared by
//! every instantiation. The cell therefore keys the infos by [`TypeId`] in a
//! map guarded by a [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// ## Example
///
/// ```
/// use ml_reflect::impls::NonGenericTypeInfoCell;
/// use ml_reflect::info::{OpaqueInfo, TypeInfo, Typed};
///
/// struct Id(u64);
///
/// impl Typed for Id {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Id>()))
///     }
/// }
///
/// assert!(Id::type_info().type_is::<Id>());
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, generating it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Container for static storage of type information with generics.
///
/// ## Example
///
/// ```
/// use core::marker::PhantomData;
/// use ml_reflect::impls::GenericTypeInfoCell;
/// use ml_reflect::info::{OpaqueInfo, TypeInfo, Typed};
///
/// struct Handle<T>(PhantomData<T>);
///
/// impl<T: 'static> Typed for Handle<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(<Handle<u8>>::type_info().type_is::<Handle<u8>>());
/// assert!(<Handle<u16>>::type_info().type_is::<Handle<u16>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<HashMap<TypeId, &'static TypeInfo, FixedState>>);

impl GenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedState::with_seed(0))))
    }

    /// Returns the info stored for `G`, generating it with `f` on first access.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        // Another thread may have won the race; its info is kept and `value` dropped.
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}

impl Default for GenericTypeInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::GenericTypeInfoCell;
    use crate::info::{OpaqueInfo, TypeInfo};

    #[test]
    fn generic_cell_keeps_one_info_per_type() {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();

        let a = CELL.get_or_insert::<u8>(|| TypeInfo::Opaque(OpaqueInfo::new::<u8>()));
        let b = CELL.get_or_insert::<u16>(|| TypeInfo::Opaque(OpaqueInfo::new::<u16>()));
        let again = CELL.get_or_insert::<u8>(|| unreachable!());

        assert!(a.type_is::<u8>());
        assert!(b.type_is::<u16>());
        assert!(core::ptr::eq(a, again));
    }
}
