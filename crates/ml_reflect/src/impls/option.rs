use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionalInfo, ReflectKind, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Optional
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|value| value as &dyn Reflect))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self.as_mut().map(|value| value as &mut dyn Reflect))
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::{ReflectMut, ReflectRef};

    #[test]
    fn optional_exposes_its_content() {
        let some = Some(3_i64);
        let ReflectRef::Optional(Some(inner)) = some.reflect_ref() else {
            panic!("expected a present optional");
        };
        assert_eq!(inner.downcast_ref::<i64>(), Some(&3));

        let none: Option<i64> = None;
        assert!(matches!(none.reflect_ref(), ReflectRef::Optional(None)));
    }

    #[test]
    fn optional_content_is_writable() {
        let mut value = Some(1_u8);
        if let ReflectMut::Optional(Some(inner)) = value.reflect_mut() {
            *inner.downcast_mut::<u8>().unwrap() = 9;
        }
        assert_eq!(value, Some(9));
    }

    #[test]
    fn optional_type_info() {
        let info = <Option<u8>>::type_info();
        assert_eq!(info.kind(), ReflectKind::Optional);
        let optional = match info {
            crate::info::TypeInfo::Optional(optional) => optional,
            _ => panic!("expected optional info"),
        };
        assert!(optional.some_ty().is::<u8>());
        assert!(optional.some_info().type_is::<u8>());
    }
}
