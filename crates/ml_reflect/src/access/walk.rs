//! Accessors that walk the member chain by name on every call.

use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;

use crate::Reflect;
use crate::access::{AccessError, AccessPath, MemberDescriptor, NavExpr, ResolveError};
use crate::info::{MemberKind, ReflectKind, Typed};
use crate::ops::{ReflectMut, ReflectRef, Struct};

/// The parameter name of reconstructed expressions.
pub(crate) const ROOT_PARAM: &str = "root";

// -----------------------------------------------------------------------------
// Steps

/// Looks through the `Option` layers of `value`.
fn enter<'a>(
    mut value: &'a dyn Reflect,
    context: &'static str,
    member: &'static str,
) -> Result<&'a dyn Reflect, AccessError> {
    loop {
        match value.reflect_ref() {
            ReflectRef::Optional(Some(inner)) => value = inner,
            ReflectRef::Optional(None) => return Err(AccessError::NullContext { context, member }),
            _ => return Ok(value),
        }
    }
}

fn enter_mut<'a>(
    mut value: &'a mut dyn Reflect,
    context: &'static str,
    member: &'static str,
) -> Result<&'a mut dyn Reflect, AccessError> {
    while value.reflect_kind() == ReflectKind::Optional {
        value = match value.reflect_mut() {
            ReflectMut::Optional(Some(inner)) => inner,
            _ => return Err(AccessError::NullContext { context, member }),
        };
    }
    Ok(value)
}

/// Views `value` as the struct declaring `member`.
fn as_host<'a>(value: &'a dyn Reflect, member: &MemberDescriptor) -> Result<&'a dyn Struct, AccessError> {
    let not_found = AccessError::MemberNotFound {
        type_path: value.reflect_type_path(),
        member: member.name(),
    };
    if value.ty_id() != member.declaring_type().id() {
        return Err(not_found);
    }
    match value.reflect_ref() {
        ReflectRef::Struct(host) => Ok(host),
        _ => Err(not_found),
    }
}

fn as_host_mut<'a>(
    value: &'a mut dyn Reflect,
    member: &MemberDescriptor,
) -> Result<&'a mut dyn Struct, AccessError> {
    let not_found = AccessError::MemberNotFound {
        type_path: value.reflect_type_path(),
        member: member.name(),
    };
    if value.ty_id() != member.declaring_type().id() {
        return Err(not_found);
    }
    match value.reflect_mut() {
        ReflectMut::Struct(host) => Ok(host),
        _ => Err(not_found),
    }
}

#[cold]
fn not_found(host: &dyn Struct, member: &MemberDescriptor) -> AccessError {
    AccessError::MemberNotFound {
        type_path: host.reflect_type_info().type_path(),
        member: member.name(),
    }
}

impl AccessPath {
    /// Walks every member but the last on `root`, looking each one up by
    /// name, and returns the value the last member is read on.
    ///
    /// Intermediate members are read as fields.
    ///
    /// ```
    /// use ml_reflect::{access::{resolve, NavExpr}, derive::Reflect, Reflect};
    ///
    /// #[derive(Reflect)]
    /// struct Address { city: String }
    /// #[derive(Reflect)]
    /// struct Customer { address: Option<Address> }
    ///
    /// let expr = NavExpr::<Customer, String>::parse("c => c.address.city").unwrap();
    /// let path = resolve(&expr).unwrap();
    ///
    /// let customer = Customer { address: Some(Address { city: "Oslo".into() }) };
    /// let parent = path.parent_of(customer.as_reflect()).unwrap();
    /// assert!(parent.is::<Address>());
    ///
    /// let homeless = Customer { address: None };
    /// assert!(path.parent_of(homeless.as_reflect()).is_err());
    /// ```
    pub fn parent_of<'a>(&self, root: &'a dyn Reflect) -> Result<&'a dyn Reflect, AccessError> {
        let mut value = root;
        let mut context = root.reflect_type_path();
        for member in self.intermediates() {
            let host = as_host(enter(value, context, member.name())?, member)?;
            value = host.field(member.name()).ok_or_else(|| not_found(host, member))?;
            context = member.name();
        }
        enter(value, context, self.terminal().name())
    }

    /// The mutable counterpart of [`AccessPath::parent_of`].
    pub fn parent_of_mut<'a>(
        &self,
        root: &'a mut dyn Reflect,
    ) -> Result<&'a mut dyn Reflect, AccessError> {
        let mut context = root.reflect_type_path();
        let mut value = root;
        for member in self.intermediates() {
            let host = as_host_mut(enter_mut(value, context, member.name())?, member)?;
            let type_path = host.reflect_type_info().type_path();
            value = host
                .field_mut(member.name())
                .ok_or(AccessError::MemberNotFound {
                    type_path,
                    member: member.name(),
                })?;
            context = member.name();
        }
        enter_mut(value, context, self.terminal().name())
    }
}

// -----------------------------------------------------------------------------
// WalkStrategy

/// Keeps the member chain and dereferences it on every call.
pub(crate) struct WalkStrategy<T, V> {
    path: AccessPath,
    _marker: PhantomData<fn(&T) -> V>,
}

impl<T: Reflect + Typed, V: Reflect + Typed + Clone> WalkStrategy<T, V> {
    pub(crate) fn new(path: AccessPath) -> Result<Self, ResolveError> {
        path.check_assignable()?;
        Ok(Self {
            path,
            _marker: PhantomData,
        })
    }

    pub(crate) fn get(&self, target: &T) -> Result<V, AccessError> {
        let terminal = self.path.terminal();
        let host = as_host(self.path.parent_of(target.as_reflect())?, terminal)?;

        match terminal.kind() {
            MemberKind::Field => {
                let field = host
                    .field(terminal.name())
                    .ok_or_else(|| not_found(host, terminal))?;
                field
                    .downcast_ref::<V>()
                    .cloned()
                    .ok_or_else(|| type_mismatch::<V>(field))
            }
            MemberKind::Property => host
                .property(terminal.name())
                .ok_or_else(|| not_found(host, terminal))??
                .take::<V>()
                .map_err(|value| type_mismatch::<V>(&*value)),
        }
    }

    pub(crate) fn set(&self, target: &mut T, value: V) -> Result<(), AccessError> {
        let terminal = self.path.terminal();
        let host = as_host_mut(self.path.parent_of_mut(target.as_reflect_mut())?, terminal)?;
        let missing = AccessError::MemberNotFound {
            type_path: host.reflect_type_info().type_path(),
            member: terminal.name(),
        };

        match terminal.kind() {
            MemberKind::Field => {
                let field = host.field_mut(terminal.name()).ok_or(missing)?;
                let found = field.reflect_type_path();
                let field = field.downcast_mut::<V>().ok_or(AccessError::TypeMismatch {
                    expected: V::type_info().type_path(),
                    found,
                })?;
                *field = value;
                Ok(())
            }
            MemberKind::Property => host
                .set_property(terminal.name(), Box::new(value))
                .ok_or(missing)?,
        }
    }

    /// Rebuilds an equivalent expression from the chain.
    #[inline]
    pub(crate) fn expression(&self) -> NavExpr<T, V> {
        self.path.to_expression(ROOT_PARAM)
    }
}

#[cold]
fn type_mismatch<V: Typed>(found: &dyn Reflect) -> AccessError {
    AccessError::TypeMismatch {
        expected: V::type_info().type_path(),
        found: found.reflect_type_path(),
    }
}

impl<T, V> Clone for WalkStrategy<T, V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, V> fmt::Debug for WalkStrategy<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkStrategy")
            .field("path", &format_args!("{}", self.path))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::type_name;

    use crate::Reflect;
    use crate::access::{AccessError, AccessPath, NavExpr, resolve};
    use crate::derive::Reflect;

    #[derive(Reflect)]
    struct Address {
        city: String,
    }

    #[derive(Reflect)]
    #[reflect(property(name = "home", ty = Address, get = Customer::home))]
    struct Customer {
        address: Option<Address>,
    }

    impl Customer {
        fn home(&self) -> Address {
            Address {
                city: "Home".into(),
            }
        }
    }

    #[derive(Reflect)]
    struct Supplier {
        address: Option<Address>,
    }

    fn path(text: &str) -> AccessPath {
        resolve(&NavExpr::<Customer, String>::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn wrong_root_type_is_member_not_found() {
        let path = path("c => c.address.city");
        let mut supplier = Supplier {
            address: Some(Address {
                city: "Oslo".into(),
            }),
        };

        assert!(matches!(
            path.parent_of(supplier.as_reflect()),
            Err(AccessError::MemberNotFound { type_path, member: "address" })
                if type_path == type_name::<Supplier>()
        ));
        assert!(matches!(
            path.parent_of_mut(supplier.as_reflect_mut()),
            Err(AccessError::MemberNotFound { type_path, member: "address" })
                if type_path == type_name::<Supplier>()
        ));
        assert_eq!(supplier.address.map(|address| address.city).as_deref(), Some("Oslo"));
    }

    #[test]
    fn intermediate_without_a_field_is_member_not_found() {
        // `home` resolves as a property, so it cannot be walked as a field.
        let path = path("c => c.home.city");
        let mut customer = Customer { address: None };

        assert!(matches!(
            path.parent_of(customer.as_reflect()),
            Err(AccessError::MemberNotFound { type_path, member: "home" })
                if type_path == type_name::<Customer>()
        ));
        assert!(matches!(
            path.parent_of_mut(customer.as_reflect_mut()),
            Err(AccessError::MemberNotFound { type_path, member: "home" })
                if type_path == type_name::<Customer>()
        ));
    }

    #[test]
    fn matching_root_reaches_the_parent() {
        let path = path("c => c.address.city");
        let customer = Customer {
            address: Some(Address {
                city: "Oslo".into(),
            }),
        };
        let parent = path.parent_of(customer.as_reflect()).unwrap();
        assert_eq!(parent.downcast_ref::<Address>().map(|a| a.city.as_str()), Some("Oslo"));
    }
}
