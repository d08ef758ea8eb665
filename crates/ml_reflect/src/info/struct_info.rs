use alloc::boxed::Box;
use core::any::Any;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::info::{MemberInfo, Type};

/// Type info for a struct with named members.
///
/// Members keep declaration order: fields first, then properties.
#[derive(Debug, Clone)]
pub struct StructInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
    index: HashMap<&'static str, usize, FixedState>,
}

impl StructInfo {
    /// Creates the info of `S` from its members.
    ///
    /// A later member with an already used name shadows the earlier one.
    pub fn new<S: Any>(members: impl IntoIterator<Item = MemberInfo>) -> Self {
        let members: Box<[MemberInfo]> = members.into_iter().collect();
        let mut index = HashMap::with_capacity_and_hasher(members.len(), FixedState::default());
        for (position, member) in members.iter().enumerate() {
            index.insert(member.name(), position);
        }
        Self {
            ty: Type::of::<S>(),
            members,
            index,
        }
    }

    /// Returns the described [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the member called `name`.
    #[inline]
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.index.get(name).map(|&position| &self.members[position])
    }

    /// Returns the member at `index`, in declaration order.
    #[inline]
    pub fn member_at(&self, index: usize) -> Option<&MemberInfo> {
        self.members.get(index)
    }

    #[inline]
    pub fn member_len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MemberInfo> {
        self.members.iter()
    }
}
