use alloc::boxed::Box;

use crate::Reflect;
use crate::access::AccessError;

/// By-name access to the members of a reflected struct.
///
/// Implemented by `#[derive(Reflect)]`. Every lookup matches on the member
/// name, so this is the slow path; [`MemberInfo`] holds the direct accessors.
///
/// # Example
///
/// ```
/// use ml_reflect::{derive::Reflect, ops::Struct};
///
/// #[derive(Reflect)]
/// struct Foo { a: u32 }
///
/// let mut foo = Foo { a: 1 };
/// *foo.field_mut("a").unwrap().downcast_mut::<u32>().unwrap() = 5;
/// assert_eq!(foo.a, 5);
/// assert!(foo.field("b").is_none());
/// ```
///
/// [`MemberInfo`]: crate::info::MemberInfo
pub trait Struct: Reflect {
    /// Returns a reference to the field called `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns a mutable reference to the field called `name`.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Runs the getter of the property called `name`.
    ///
    /// `None` if there is no such property. Errors raised by the getter
    /// itself come back as [`AccessError::Member`].
    fn property(&self, name: &str) -> Option<Result<Box<dyn Reflect>, AccessError>>;

    /// Runs the setter of the property called `name`.
    ///
    /// `None` if there is no such property or it is read-only.
    fn set_property(
        &mut self,
        name: &str,
        value: Box<dyn Reflect>,
    ) -> Option<Result<(), AccessError>>;

    /// Returns the name of the member at `index`: fields first, then properties.
    fn name_at(&self, index: usize) -> Option<&'static str>;

    /// Returns the number of members, properties included.
    fn member_len(&self) -> usize;
}
