//! Accessors composed once from the generated member functions.
//!
//! The body of the lambda is compiled node by node: every member node
//! becomes a call to the access function stored in its [`MemberInfo`],
//! preceded by a null check for each `Option` layer of the value it is read
//! on. Calls then run the composed closures; no name is looked up.
//!
//! [`MemberInfo`]: crate::info::MemberInfo

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use core::fmt;

use crate::Reflect;
use crate::access::{AccessError, AccessPath, Expr, MemberDescriptor, NavExpr, ResolveError};
use crate::info::{MemberAccess, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

/// The name of the value parameter of the synthesized write lambda.
pub(crate) const VALUE_PARAM: &str = "value";

// -----------------------------------------------------------------------------
// Callables

type PlaceFn =
    Arc<dyn for<'a> Fn(&'a dyn Reflect) -> Result<&'a dyn Reflect, AccessError> + Send + Sync>;

type PlaceMutFn = Arc<
    dyn for<'a> Fn(&'a mut dyn Reflect) -> Result<&'a mut dyn Reflect, AccessError> + Send + Sync,
>;

pub(crate) type GetFn<T, V> = Arc<dyn Fn(&T) -> Result<V, AccessError> + Send + Sync>;

pub(crate) type SetFn<T, V> = Arc<dyn Fn(&mut T, V) -> Result<(), AccessError> + Send + Sync>;

// Pins the higher-ranked signature on the closures.
#[inline]
fn place<F>(f: F) -> PlaceFn
where
    F: for<'a> Fn(&'a dyn Reflect) -> Result<&'a dyn Reflect, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
fn place_mut<F>(f: F) -> PlaceMutFn
where
    F: for<'a> Fn(&'a mut dyn Reflect) -> Result<&'a mut dyn Reflect, AccessError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// Step context

/// Where a member is read: the info of the value it is read on, and the
/// name reported when that value is absent.
#[derive(Clone, Copy)]
struct Context {
    name: &'static str,
    optional_depth: usize,
}

impl Context {
    fn of<T: Typed>(prefix: &[MemberDescriptor]) -> Self {
        let (name, info) = match prefix.last() {
            Some(member) => (member.name(), member.info().value_info()),
            None => (T::type_info().type_path(), T::type_info()),
        };
        Self {
            name,
            optional_depth: optional_depth(info),
        }
    }

    #[inline]
    fn unwrap<'a>(
        self,
        mut value: &'a dyn Reflect,
        member: &'static str,
    ) -> Result<&'a dyn Reflect, AccessError> {
        for _ in 0..self.optional_depth {
            let type_path = value.reflect_type_path();
            value = match value.reflect_ref() {
                ReflectRef::Optional(Some(inner)) => inner,
                ReflectRef::Optional(None) => return Err(self.absent(member)),
                _ => return Err(AccessError::MemberNotFound { type_path, member }),
            };
        }
        Ok(value)
    }

    #[inline]
    fn unwrap_mut<'a>(
        self,
        mut value: &'a mut dyn Reflect,
        member: &'static str,
    ) -> Result<&'a mut dyn Reflect, AccessError> {
        for _ in 0..self.optional_depth {
            let type_path = value.reflect_type_path();
            value = match value.reflect_mut() {
                ReflectMut::Optional(Some(inner)) => inner,
                ReflectMut::Optional(None) => return Err(self.absent(member)),
                _ => return Err(AccessError::MemberNotFound { type_path, member }),
            };
        }
        Ok(value)
    }

    #[cold]
    fn absent(self, member: &'static str) -> AccessError {
        AccessError::NullContext {
            context: self.name,
            member,
        }
    }
}

fn optional_depth(mut info: &'static TypeInfo) -> usize {
    let mut depth = 0;
    while let TypeInfo::Optional(optional) = info {
        depth += 1;
        info = optional.some_info();
    }
    depth
}

// -----------------------------------------------------------------------------
// Compiler

struct Compiler<'e, T> {
    param: &'e str,
    _marker: core::marker::PhantomData<fn(&T)>,
}

#[cold]
fn mismatch(expr: &Expr) -> ResolveError {
    ResolveError::UnsupportedExpressionShape {
        expression: expr.to_string(),
        reason: "the expression does not match its resolved members",
    }
}

impl<'e, T: Typed> Compiler<'e, T> {
    /// Splits `target.name` into its target and the member bound to `name`.
    fn split<'m>(
        &self,
        expr: &'e Expr,
        members: &'m [MemberDescriptor],
    ) -> Result<(&'e Expr, &'m [MemberDescriptor], MemberDescriptor), ResolveError> {
        match (expr, members.split_last()) {
            (Expr::Member { target, name }, Some((member, prefix))) if member.name() == name => {
                Ok((&**target, prefix, *member))
            }
            _ => Err(mismatch(expr)),
        }
    }

    fn is_root(&self, expr: &Expr, members: &[MemberDescriptor]) -> bool {
        matches!(expr, Expr::Parameter(name) if name == self.param) && members.is_empty()
    }

    /// Compiles an expression that denotes a borrowed location.
    fn place(&self, expr: &'e Expr, members: &[MemberDescriptor]) -> Result<PlaceFn, ResolveError> {
        if self.is_root(expr, members) {
            return Ok(place(|root| Ok(root)));
        }

        let (target, prefix, member) = self.split(expr, members)?;
        let MemberAccess::Field(field) = *member.info().access() else {
            return Err(mismatch(expr));
        };
        let parent = self.place(target, prefix)?;
        let context = Context::of::<T>(prefix);
        let name = member.name();
        let get = field.get;

        Ok(place(move |root| {
            let value = context.unwrap(parent(root)?, name)?;
            let type_path = value.reflect_type_path();
            get(value).ok_or(AccessError::MemberNotFound { type_path, member: name })
        }))
    }

    /// Compiles an expression that denotes a mutably borrowed location.
    fn place_mut(
        &self,
        expr: &'e Expr,
        members: &[MemberDescriptor],
    ) -> Result<PlaceMutFn, ResolveError> {
        if self.is_root(expr, members) {
            return Ok(place_mut(|root| Ok(root)));
        }

        let (target, prefix, member) = self.split(expr, members)?;
        let MemberAccess::Field(field) = *member.info().access() else {
            return Err(mismatch(expr));
        };
        let parent = self.place_mut(target, prefix)?;
        let context = Context::of::<T>(prefix);
        let name = member.name();
        let get_mut = field.get_mut;

        Ok(place_mut(move |root| {
            let value = context.unwrap_mut(parent(root)?, name)?;
            let type_path = value.reflect_type_path();
            get_mut(value).ok_or(AccessError::MemberNotFound { type_path, member: name })
        }))
    }
}

impl<'e, T: Reflect + Typed> Compiler<'e, T> {
    /// Compiles the read lambda `param => body`.
    fn read<V: Reflect + Typed + Clone>(
        &self,
        body: &'e Expr,
        path: &AccessPath,
    ) -> Result<GetFn<T, V>, ResolveError> {
        let (target, prefix, member) = self.split(body, path.members())?;
        let parent = self.place(target, prefix)?;
        let context = Context::of::<T>(prefix);
        let name = member.name();

        let read: GetFn<T, V> = match *member.info().access() {
            MemberAccess::Field(field) => {
                let get = field.get;
                Arc::new(move |target: &T| {
                    let value = context.unwrap(parent(target.as_reflect())?, name)?;
                    let type_path = value.reflect_type_path();
                    let field = get(value).ok_or(AccessError::MemberNotFound {
                        type_path,
                        member: name,
                    })?;
                    field
                        .downcast_ref::<V>()
                        .cloned()
                        .ok_or_else(|| type_mismatch::<V>(field))
                })
            }
            MemberAccess::Property(property) => {
                let get = property.get;
                Arc::new(move |target: &T| {
                    let value = context.unwrap(parent(target.as_reflect())?, name)?;
                    get(value)?
                        .take::<V>()
                        .map_err(|value| type_mismatch::<V>(&*value))
                })
            }
        };
        Ok(read)
    }

    /// Compiles the write lambda `(param, value) => body = value`.
    fn write<V: Reflect + Typed>(
        &self,
        assign: &'e Expr,
        path: &AccessPath,
    ) -> Result<SetFn<T, V>, ResolveError> {
        let Expr::Assign { target, value } = assign else {
            return Err(mismatch(assign));
        };
        if !matches!(&**value, Expr::Parameter(name) if name == VALUE_PARAM) {
            return Err(mismatch(assign));
        }

        let (target, prefix, member) = self.split(target, path.members())?;
        let parent = self.place_mut(target, prefix)?;
        let context = Context::of::<T>(prefix);
        let name = member.name();

        let write: SetFn<T, V> = match *member.info().access() {
            MemberAccess::Field(field) => {
                let get_mut = field.get_mut;
                Arc::new(move |target: &mut T, value: V| {
                    let slot = context.unwrap_mut(parent(target.as_reflect_mut())?, name)?;
                    let type_path = slot.reflect_type_path();
                    let field = get_mut(slot).ok_or(AccessError::MemberNotFound {
                        type_path,
                        member: name,
                    })?;
                    let found = field.reflect_type_path();
                    let field = field.downcast_mut::<V>().ok_or(AccessError::TypeMismatch {
                        expected: V::type_info().type_path(),
                        found,
                    })?;
                    *field = value;
                    Ok(())
                })
            }
            MemberAccess::Property(property) => {
                let Some(set) = property.set else {
                    return Err(ResolveError::NotAssignable {
                        member: name,
                        reason: "the property has no setter",
                    });
                };
                Arc::new(move |target: &mut T, value: V| {
                    let slot = context.unwrap_mut(parent(target.as_reflect_mut())?, name)?;
                    set(slot, Box::new(value))
                })
            }
        };
        Ok(write)
    }
}

#[cold]
fn type_mismatch<V: Typed>(found: &dyn Reflect) -> AccessError {
    AccessError::TypeMismatch {
        expected: V::type_info().type_path(),
        found: found.reflect_type_path(),
    }
}

// -----------------------------------------------------------------------------
// CompiledStrategy

/// The read and write callables of an accessor, composed at construction.
pub(crate) struct CompiledStrategy<T, V> {
    expr: NavExpr<T, V>,
    get: GetFn<T, V>,
    set: SetFn<T, V>,
}

impl<T: Reflect + Typed, V: Reflect + Typed + Clone> CompiledStrategy<T, V> {
    /// Compiles `expr`, whose body was resolved to `path`.
    pub(crate) fn compile(expr: NavExpr<T, V>, path: &AccessPath) -> Result<Self, ResolveError> {
        path.check_assignable()?;

        let compiler = Compiler::<T> {
            param: expr.param(),
            _marker: core::marker::PhantomData,
        };
        let get = compiler.read::<V>(expr.body(), path)?;

        let assign = expr.body().clone().assign(Expr::param(VALUE_PARAM));
        let set = compiler.write::<V>(&assign, path)?;

        Ok(Self { expr, get, set })
    }

    #[inline]
    pub(crate) fn get(&self, target: &T) -> Result<V, AccessError> {
        (self.get)(target)
    }

    #[inline]
    pub(crate) fn set(&self, target: &mut T, value: V) -> Result<(), AccessError> {
        (self.set)(target, value)
    }

    /// The expression the callables were compiled from.
    #[inline]
    pub(crate) fn expression(&self) -> &NavExpr<T, V> {
        &self.expr
    }
}

impl<T, V> Clone for CompiledStrategy<T, V> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr.clone(),
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<T, V> fmt::Debug for CompiledStrategy<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledStrategy")
            .field("expr", &format_args!("{}", self.expr))
            .finish_non_exhaustive()
    }
}
