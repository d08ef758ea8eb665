use alloc::string::String;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, NonGenericTypeInfoCell};
use crate::info::{OpaqueInfo, ReflectKind, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

macro_rules! impl_opaque_reflect {
    () => {
        #[inline]
        fn reflect_kind(&self) -> ReflectKind {
            ReflectKind::Opaque
        }

        #[inline]
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Opaque(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Opaque(self)
        }
    };
}

macro_rules! impl_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<$ty>()))
                }
            }

            impl Reflect for $ty {
                impl_opaque_reflect!();
            }
        )*
    };
}

impl_opaque!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
);

impl<T: Typed + Send + Sync> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}

impl<T: Typed + Send + Sync> Reflect for Vec<T> {
    impl_opaque_reflect!();
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn opaque_values() {
        let value: &dyn Reflect = &7_u32;
        assert_eq!(value.reflect_kind(), ReflectKind::Opaque);
        assert_eq!(value.reflect_type_path(), "u32");
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
        assert!(value.downcast_ref::<i32>().is_none());

        assert_eq!(String::type_info().kind(), ReflectKind::Opaque);
    }

    #[test]
    fn vec_is_opaque_per_element_type() {
        let a = <Vec<u8>>::type_info();
        let b = <Vec<String>>::type_info();
        assert!(a.type_is::<Vec<u8>>());
        assert!(b.type_is::<Vec<String>>());

        let boxed = vec![1_u8, 2].into_boxed_reflect();
        assert_eq!(boxed.take::<Vec<u8>>().ok(), Some(vec![1, 2]));
    }
}
