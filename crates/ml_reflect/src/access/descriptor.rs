use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::access::{Expr, NavExpr, ResolveError};
use crate::info::{MemberInfo, MemberKind, Type, Typed};

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One step of an access chain: a member of a declaring type.
///
/// Equality and hashing only consider the declaring type, the name and the
/// kind.
///
/// ```
/// use ml_reflect::{access::MemberDescriptor, derive::Reflect, info::MemberKind};
///
/// #[derive(Reflect)]
/// struct Address { city: String }
///
/// let city = MemberDescriptor::find::<Address>("city").unwrap();
/// assert_eq!(city.name(), "city");
/// assert_eq!(city.kind(), MemberKind::Field);
/// assert!(city.declaring_type().is::<Address>());
/// assert!(MemberDescriptor::find::<Address>("zip").is_none());
/// ```
#[derive(Clone, Copy)]
pub struct MemberDescriptor {
    info: &'static MemberInfo,
}

impl MemberDescriptor {
    #[inline]
    pub(crate) const fn new(info: &'static MemberInfo) -> Self {
        Self { info }
    }

    /// Looks up the member `name` of `S`, looking through `Option` layers.
    pub fn find<S: Typed>(name: &str) -> Option<Self> {
        S::type_info()
            .context()
            .as_struct()?
            .member(name)
            .map(Self::new)
    }

    /// The type that declares the member.
    #[inline]
    pub fn declaring_type(&self) -> &'static Type {
        self.info.declaring_type()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.info.kind()
    }

    /// The type of the member's value.
    #[inline]
    pub fn value_type(&self) -> &'static Type {
        self.info.value_type()
    }

    /// The static info with the member's access functions.
    #[inline]
    pub fn info(&self) -> &'static MemberInfo {
        self.info
    }
}

impl PartialEq for MemberDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type() == other.declaring_type()
            && self.name() == other.name()
            && self.kind() == other.kind()
    }
}

impl Eq for MemberDescriptor {}

impl Hash for MemberDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type().hash(state);
        self.name().hash(state);
        self.kind().hash(state);
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("declaring", self.declaring_type())
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type().ident(), self.name())
    }
}

// -----------------------------------------------------------------------------
// AccessPath

/// Stands in for the expression of a path with no members.
const EMPTY_PATH: &str = "<empty path>";

/// A non-empty chain of members, root first.
///
/// Every member after the first is declared by the value type of the one
/// before it, looking through `Option` layers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessPath {
    members: Box<[MemberDescriptor]>,
}

impl AccessPath {
    /// Builds a path from its members, checking that they form a chain.
    ///
    /// ```
    /// use ml_reflect::{access::{AccessPath, MemberDescriptor}, derive::Reflect};
    ///
    /// #[derive(Reflect)]
    /// struct Address { city: String }
    /// #[derive(Reflect)]
    /// struct Customer { address: Option<Address> }
    ///
    /// let address = MemberDescriptor::find::<Customer>("address").unwrap();
    /// let city = MemberDescriptor::find::<Address>("city").unwrap();
    ///
    /// let path = AccessPath::new([address, city]).unwrap();
    /// assert_eq!(path.to_string(), "Customer.address.city");
    ///
    /// assert!(AccessPath::new([city, address]).is_err());
    /// assert!(AccessPath::new(core::iter::empty()).is_err());
    /// ```
    pub fn new(members: impl IntoIterator<Item = MemberDescriptor>) -> Result<Self, ResolveError> {
        let members: Box<[MemberDescriptor]> = members.into_iter().collect();
        if members.is_empty() {
            return Err(ResolveError::UnsupportedExpressionShape {
                expression: String::from(EMPTY_PATH),
                reason: "an access path needs at least one member",
            });
        }
        for pair in members.windows(2) {
            let context = pair[0].info().value_info().context();
            if context.ty() != pair[1].declaring_type() {
                return Err(ResolveError::UnknownMember {
                    type_path: context.type_path(),
                    member: pair[1].name().into(),
                });
            }
        }
        Ok(Self { members })
    }

    /// Wraps members that were bound one after the other.
    #[inline]
    pub(crate) fn from_chain(members: Vec<MemberDescriptor>) -> Self {
        debug_assert!(!members.is_empty());
        Self {
            members: members.into_boxed_slice(),
        }
    }

    /// The members, root first.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MemberDescriptor> {
        self.members.iter()
    }

    /// The type declaring the first member.
    #[inline]
    pub fn root_type(&self) -> &'static Type {
        self.first().declaring_type()
    }

    /// The type of the value the chain ends in.
    #[inline]
    pub fn value_type(&self) -> &'static Type {
        self.terminal().value_type()
    }

    /// The last member.
    #[inline]
    pub fn terminal(&self) -> &MemberDescriptor {
        // Non-empty by construction.
        &self.members[self.members.len() - 1]
    }

    #[inline]
    fn first(&self) -> &MemberDescriptor {
        &self.members[0]
    }

    /// Every member but the last.
    #[inline]
    pub(crate) fn intermediates(&self) -> &[MemberDescriptor] {
        &self.members[..self.members.len() - 1]
    }

    /// Rebuilds the body `param.m1.m2...` of this chain.
    pub fn to_body(&self, param: &str) -> Expr {
        self.iter()
            .fold(Expr::param(param), |expr, member| expr.member(member.name()))
    }

    /// Rebuilds a navigation lambda equivalent to this chain.
    #[inline]
    pub fn to_expression<T, V>(&self, param: &str) -> NavExpr<T, V> {
        NavExpr::new(param, self.to_body(param))
    }
}

impl<'a> IntoIterator for &'a AccessPath {
    type Item = &'a MemberDescriptor;
    type IntoIter = core::slice::Iter<'a, MemberDescriptor>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl fmt::Debug for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.members.iter()).finish()
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_type().ident())?;
        for member in self.iter() {
            write!(f, ".{}", member.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{AccessPath, MemberDescriptor};
    use crate::access::ResolveError;

    #[test]
    fn empty_path_names_itself() {
        let error = AccessPath::new(core::iter::empty::<MemberDescriptor>()).unwrap_err();
        assert!(matches!(
            &error,
            ResolveError::UnsupportedExpressionShape { expression, .. } if expression == "<empty path>"
        ));
        assert_eq!(
            error.to_string(),
            "Unsupported expression `<empty path>`: an access path needs at least one member"
        );
    }
}
