use alloc::string::ToString;
use alloc::vec::Vec;

use crate::access::{AccessPath, Expr, MemberDescriptor, NavExpr, ResolveError};
use crate::info::{MemberKind, Type, Typed};

/// Turns a navigation lambda into the chain of members it dereferences.
///
/// The body must be a pure member chain on the lambda parameter. Names are
/// bound root first against `T`'s type info, looking through `Option`
/// layers, and the last member must produce a `V`.
///
/// ```
/// use ml_reflect::{access::{resolve, NavExpr, ResolveError}, derive::Reflect};
///
/// #[derive(Reflect)]
/// struct Address { city: String }
/// #[derive(Reflect)]
/// struct Customer { address: Option<Address> }
///
/// let expr = NavExpr::<Customer, String>::parse("c => c.address.city").unwrap();
/// let path = resolve(&expr).unwrap();
/// assert_eq!(path.to_string(), "Customer.address.city");
///
/// let expr = NavExpr::<Customer, String>::parse("c => c.address.city.trim()").unwrap();
/// assert!(matches!(resolve(&expr), Err(ResolveError::UnsupportedExpressionShape { .. })));
/// ```
pub fn resolve<T: Typed, V: Typed>(expr: &NavExpr<T, V>) -> Result<AccessPath, ResolveError> {
    let names = collect_members(expr)?;

    let mut info = T::type_info();
    let mut members = Vec::with_capacity(names.len());
    for name in names {
        let context = info.context();
        let Some(member) = context.as_struct().and_then(|s| s.member(name)) else {
            return Err(ResolveError::UnknownMember {
                type_path: context.type_path(),
                member: name.to_string(),
            });
        };
        members.push(MemberDescriptor::new(member));
        info = member.value_info();
    }

    let path = AccessPath::from_chain(members);
    let expected = Type::of::<V>();
    if *path.value_type() != expected {
        return Err(ResolveError::ValueTypeMismatch {
            expected: expected.path(),
            found: path.value_type().path(),
        });
    }

    log::trace!("resolved `{expr}` to `{path}`");
    Ok(path)
}

/// Collects the member names from the leaf up to the parameter, then
/// returns them root first.
fn collect_members<T, V>(expr: &NavExpr<T, V>) -> Result<Vec<&str>, ResolveError> {
    let unsupported = |reason: &'static str| ResolveError::UnsupportedExpressionShape {
        expression: expr.to_string(),
        reason,
    };

    let mut names = Vec::new();
    let mut current = expr.body();
    loop {
        match current {
            Expr::Member { target, name } => {
                names.push(name.as_str());
                current = target;
            }
            Expr::Parameter(name) if name == expr.param() => break,
            Expr::Parameter(_) => {
                return Err(unsupported("the chain does not start at the lambda parameter"));
            }
            Expr::Call { .. } => return Err(unsupported("method calls are not member accesses")),
            Expr::Index { .. } => return Err(unsupported("indexing is not a member access")),
            Expr::Literal(_) => return Err(unsupported("a constant is not a member access")),
            Expr::Binary { .. } => return Err(unsupported("computed values are not member accesses")),
            Expr::Assign { .. } => return Err(unsupported("assignments are not member accesses")),
            Expr::Opaque(_) => return Err(unsupported("unsupported syntax")),
        }
    }

    if names.is_empty() {
        return Err(unsupported("the body must access at least one member"));
    }
    names.reverse();
    Ok(names)
}

impl AccessPath {
    /// Checks that the chain denotes a location that can be written.
    ///
    /// A property yields an owned value, so only the last member may be a
    /// property and that property needs a setter.
    pub fn check_assignable(&self) -> Result<(), ResolveError> {
        if let Some(member) = self
            .intermediates()
            .iter()
            .find(|member| member.kind() == MemberKind::Property)
        {
            return Err(ResolveError::NotAssignable {
                member: member.name(),
                reason: "an intermediate property yields a temporary value",
            });
        }

        let terminal = self.terminal();
        if !terminal.info().is_writable() {
            return Err(ResolveError::NotAssignable {
                member: terminal.name(),
                reason: "the property has no setter",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::access::{AccessPath, Expr, NavExpr, ResolveError, resolve};
    use crate::derive::Reflect;

    #[derive(Reflect)]
    struct Address {
        city: String,
    }

    #[derive(Reflect)]
    struct Customer {
        id: u32,
        address: Option<Address>,
    }

    fn shape_error<V: crate::info::Typed>(text: &str) -> &'static str {
        let expr = NavExpr::<Customer, V>::parse(text).unwrap();
        match resolve(&expr) {
            Err(ResolveError::UnsupportedExpressionShape { reason, .. }) => reason,
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[test]
    fn binds_through_optional_members() {
        let expr = NavExpr::<Customer, String>::parse("c => c.address.city").unwrap();
        let path = resolve(&expr).unwrap();

        let names: alloc::vec::Vec<_> = path.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["address", "city"]);
        assert!(path.root_type().is::<Customer>());
        assert!(path.value_type().is::<String>());
        assert!(path.terminal().declaring_type().is::<Address>());
    }

    #[test]
    fn rejects_everything_but_member_chains() {
        assert_eq!(
            shape_error::<String>("c => c.address.city.trim()"),
            "method calls are not member accesses"
        );
        assert_eq!(shape_error::<u32>("c => c.id + 1"), "computed values are not member accesses");
        assert_eq!(shape_error::<u32>("c => other.id"), "the chain does not start at the lambda parameter");
        assert_eq!(shape_error::<Customer>("c => c"), "the body must access at least one member");
        assert_eq!(shape_error::<u32>("c => c.ids[0]"), "indexing is not a member access");
        assert_eq!(shape_error::<u32>("c => 3"), "a constant is not a member access");
    }

    #[test]
    fn unknown_member_and_type_mismatch() {
        let expr = NavExpr::<Customer, String>::parse("c => c.address.zip").unwrap();
        assert!(matches!(
            resolve(&expr),
            Err(ResolveError::UnknownMember { member, .. }) if member == "zip"
        ));

        let expr = NavExpr::<Customer, u64>::parse("c => c.id").unwrap();
        assert!(matches!(resolve(&expr), Err(ResolveError::ValueTypeMismatch { .. })));
    }

    #[test]
    fn chain_round_trips_to_an_expression() {
        let expr = NavExpr::<Customer, String>::new("c", Expr::param("c").member("address").member("city"));
        let path = resolve(&expr).unwrap();
        assert_eq!(path.to_expression::<Customer, String>("c"), expr);
        assert_eq!(AccessPath::new(path.members().iter().copied()).unwrap(), path);
    }
}
