use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Reflect;
use crate::access::walk::WalkStrategy;
use crate::access::{AccessError, AccessPath, MemberDescriptor, NavExpr, ResolveError, resolve};
use crate::info::{Type, Typed};

crate::cfg::codegen! {
    use crate::access::compiled::CompiledStrategy;
}

// -----------------------------------------------------------------------------
// StrategyKind

/// How an [`Accessor`] executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Callables composed once from the generated member functions.
    ///
    /// Requires the `codegen` feature.
    Compiled,
    /// The member chain is walked by name on every call.
    Walk,
}

impl StrategyKind {
    /// The strategy [`Accessor::from_expression`] picks in this build.
    pub const DEFAULT: StrategyKind =
        crate::cfg::codegen!(if { StrategyKind::Compiled } else { StrategyKind::Walk });
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Compiled => f.write_str("compiled"),
            StrategyKind::Walk => f.write_str("walk"),
        }
    }
}

enum Strategy<T, V> {
    #[cfg(feature = "codegen")]
    Compiled(CompiledStrategy<T, V>),
    Walk(WalkStrategy<T, V>),
}

impl<T, V> Clone for Strategy<T, V> {
    fn clone(&self) -> Self {
        match self {
            #[cfg(feature = "codegen")]
            Strategy::Compiled(strategy) => Strategy::Compiled(strategy.clone()),
            Strategy::Walk(strategy) => Strategy::Walk(strategy.clone()),
        }
    }
}

// -----------------------------------------------------------------------------
// Accessor

/// A reusable getter/setter pair for a value nested in a `T`.
///
/// Built once from a navigation lambda, then applied to any number of
/// targets. Two accessors are equal when they end in the same member,
/// whatever their root type, so an accessor can key a map of per-member
/// state.
///
/// # Examples
///
/// ```
/// use ml_reflect::{access::{Accessor, NavExpr}, derive::Reflect};
///
/// #[derive(Reflect)]
/// struct Address { city: String }
///
/// #[derive(Reflect)]
/// struct Customer { name: String, address: Option<Address> }
///
/// let expr = NavExpr::<Customer, String>::parse("c => c.address.city").unwrap();
/// let city = Accessor::from_expression(expr).unwrap();
///
/// let mut customer = Customer {
///     name: "Ada".into(),
///     address: Some(Address { city: "London".into() }),
/// };
/// assert_eq!(city.get(&customer).unwrap(), "London");
///
/// city.set(&mut customer, "Paris".into()).unwrap();
/// assert_eq!(customer.address.as_ref().unwrap().city, "Paris");
///
/// customer.address = None;
/// assert!(city.get(&customer).is_err());
/// ```
pub struct Accessor<T, V> {
    path: AccessPath,
    strategy: Strategy<T, V>,
}

impl<T: Reflect + Typed, V: Reflect + Typed + Clone> Accessor<T, V> {
    /// Resolves `expr` and builds an accessor with the strategy of this
    /// build, see [`StrategyKind::DEFAULT`].
    pub fn from_expression(expr: NavExpr<T, V>) -> Result<Self, ResolveError> {
        crate::cfg::codegen!(if { Self::compiled(expr) } else { Self::walked(expr) })
    }

    /// Resolves `expr` and composes its callables once.
    #[cfg(feature = "codegen")]
    pub fn compiled(expr: NavExpr<T, V>) -> Result<Self, ResolveError> {
        let path = resolve(&expr)?;
        let strategy = CompiledStrategy::compile(expr, &path)?;
        Ok(Self::build(path, Strategy::Compiled(strategy)))
    }

    /// Resolves `expr` and keeps the member chain to walk it on every call.
    pub fn walked(expr: NavExpr<T, V>) -> Result<Self, ResolveError> {
        let path = resolve(&expr)?;
        let strategy = WalkStrategy::new(path.clone())?;
        Ok(Self::build(path, Strategy::Walk(strategy)))
    }

    /// Builds an accessor from an existing member chain.
    ///
    /// The chain must start at `T` (looking through `Option` layers) and end
    /// in a `V`.
    pub fn from_path(path: AccessPath) -> Result<Self, ResolveError> {
        let root = T::type_info().context();
        if root.ty() != path.root_type() {
            return Err(ResolveError::UnknownMember {
                type_path: root.type_path(),
                member: path.members()[0].name().into(),
            });
        }
        let expected = Type::of::<V>();
        if *path.value_type() != expected {
            return Err(ResolveError::ValueTypeMismatch {
                expected: expected.path(),
                found: path.value_type().path(),
            });
        }

        crate::cfg::codegen!(if {
            let expr = path.to_expression(crate::access::walk::ROOT_PARAM);
            let strategy = CompiledStrategy::compile(expr, &path)?;
            Ok(Self::build(path, Strategy::Compiled(strategy)))
        } else {
            let strategy = WalkStrategy::new(path.clone())?;
            Ok(Self::build(path, Strategy::Walk(strategy)))
        })
    }

    fn build(path: AccessPath, strategy: Strategy<T, V>) -> Self {
        let accessor = Self { path, strategy };
        log::debug!(
            "built {} accessor `{}` for `{}`",
            accessor.strategy(),
            accessor.path,
            Type::of::<T>(),
        );
        accessor
    }

    /// Reads the value from `target`.
    ///
    /// Fails with [`AccessError::NullContext`] when an intermediate value is
    /// `None`; errors of a property getter are returned unchanged.
    #[inline]
    pub fn get(&self, target: &T) -> Result<V, AccessError> {
        match &self.strategy {
            #[cfg(feature = "codegen")]
            Strategy::Compiled(strategy) => strategy.get(target),
            Strategy::Walk(strategy) => strategy.get(target),
        }
    }

    /// Writes `value` into `target`.
    ///
    /// Only the last member is written; every other value on the way is
    /// left as it is.
    #[inline]
    pub fn set(&self, target: &mut T, value: V) -> Result<(), AccessError> {
        match &self.strategy {
            #[cfg(feature = "codegen")]
            Strategy::Compiled(strategy) => strategy.set(target, value),
            Strategy::Walk(strategy) => strategy.set(target, value),
        }
    }

    /// Returns a navigation lambda equivalent to this accessor.
    ///
    /// The compiled strategy returns the expression it was built from; the
    /// walk strategy rebuilds one from the chain, with a parameter named
    /// `root`.
    pub fn to_expression(&self) -> NavExpr<T, V> {
        match &self.strategy {
            #[cfg(feature = "codegen")]
            Strategy::Compiled(strategy) => strategy.expression().clone(),
            Strategy::Walk(strategy) => strategy.expression(),
        }
    }
}

impl<T, V> Accessor<T, V> {
    /// The last member of the chain; it alone defines equality.
    #[inline]
    pub fn terminal_member(&self) -> &MemberDescriptor {
        self.path.terminal()
    }

    #[inline]
    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        match &self.strategy {
            #[cfg(feature = "codegen")]
            Strategy::Compiled(_) => StrategyKind::Compiled,
            Strategy::Walk(_) => StrategyKind::Walk,
        }
    }
}

/// Resolves `expr` into an [`Accessor`] with the strategy of this build.
///
/// Same as [`Accessor::from_expression`].
#[inline]
pub fn resolve_accessor<T, V>(expr: NavExpr<T, V>) -> Result<Accessor<T, V>, ResolveError>
where
    T: Reflect + Typed,
    V: Reflect + Typed + Clone,
{
    Accessor::from_expression(expr)
}

// -----------------------------------------------------------------------------
// Conversions

impl<T, V> TryFrom<NavExpr<T, V>> for Accessor<T, V>
where
    T: Reflect + Typed,
    V: Reflect + Typed + Clone,
{
    type Error = ResolveError;

    #[inline]
    fn try_from(expr: NavExpr<T, V>) -> Result<Self, Self::Error> {
        Accessor::from_expression(expr)
    }
}

impl<T, V> From<&Accessor<T, V>> for NavExpr<T, V>
where
    T: Reflect + Typed,
    V: Reflect + Typed + Clone,
{
    #[inline]
    fn from(accessor: &Accessor<T, V>) -> Self {
        accessor.to_expression()
    }
}

impl<T, V> From<Accessor<T, V>> for NavExpr<T, V>
where
    T: Reflect + Typed,
    V: Reflect + Typed + Clone,
{
    #[inline]
    fn from(accessor: Accessor<T, V>) -> Self {
        accessor.to_expression()
    }
}

// -----------------------------------------------------------------------------
// Identity

impl<T, V, U, W> PartialEq<Accessor<U, W>> for Accessor<T, V> {
    #[inline]
    fn eq(&self, other: &Accessor<U, W>) -> bool {
        self.terminal_member() == other.terminal_member()
    }
}

impl<T, V> Eq for Accessor<T, V> {}

impl<T, V> Hash for Accessor<T, V> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.terminal_member().hash(state);
    }
}

impl<T, V> Clone for Accessor<T, V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<T, V> fmt::Debug for Accessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("path", &format_args!("{}", self.path))
            .field("strategy", &self.strategy())
            .finish()
    }
}

impl<T, V> fmt::Display for Accessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use foldhash::fast::FixedState;
    use hashbrown::HashMap;
    use proptest::prelude::*;

    use super::{Accessor, StrategyKind, resolve_accessor};
    use crate::Reflect;
    use crate::access::{AccessError, MemberError, NavExpr, ResolveError};
    use crate::derive::{Reflect, nav};
    use crate::info::MemberKind;

    #[derive(Reflect, Clone, Debug, PartialEq, Default)]
    struct Geo {
        lat: f64,
        lon: f64,
    }

    #[derive(Reflect, Clone, Debug, PartialEq, Default)]
    #[reflect(property(name = "label", ty = String, get = Address::label))]
    struct Address {
        city: String,
        zip: u32,
        geo: Option<Geo>,
    }

    impl Address {
        fn label(&self) -> String {
            format!("{} {}", self.zip, self.city)
        }
    }

    #[derive(Reflect, Clone, Debug, PartialEq, Default)]
    #[reflect(property(
        name = "nickname",
        ty = String,
        get = Customer::nickname,
        try_set = Customer::set_nickname
    ))]
    #[reflect(property(name = "home", ty = Address, get = Customer::home, set = Customer::set_home))]
    struct Customer {
        id: u32,
        name: String,
        address: Option<Address>,
        billing: Address,
        #[reflect(ignore)]
        nick: String,
    }

    impl Customer {
        fn nickname(&self) -> String {
            self.nick.clone()
        }

        fn set_nickname(&mut self, value: String) -> Result<(), MemberError> {
            if value.is_empty() {
                return Err(MemberError::from("nickname must not be empty"));
            }
            self.nick = value;
            Ok(())
        }

        fn home(&self) -> Address {
            self.billing.clone()
        }

        fn set_home(&mut self, value: Address) {
            self.billing = value;
        }
    }

    #[derive(Reflect, Clone, Debug, PartialEq, Default)]
    struct Supplier {
        billing: Address,
    }

    fn customer() -> Customer {
        Customer {
            id: 7,
            name: "Ada".into(),
            address: Some(Address {
                city: "London".into(),
                zip: 10,
                geo: Some(Geo { lat: 51.5, lon: -0.1 }),
            }),
            billing: Address {
                city: "Leeds".into(),
                zip: 20,
                geo: None,
            },
            nick: "ada".into(),
        }
    }

    fn both<V: Reflect + crate::info::Typed + Clone>(text: &str) -> [Accessor<Customer, V>; 2] {
        let expr = NavExpr::<Customer, V>::parse(text).unwrap();
        let walked = Accessor::walked(expr.clone()).unwrap();
        crate::cfg::codegen!(if {
            [Accessor::compiled(expr).unwrap(), walked]
        } else {
            let _ = expr;
            [walked.clone(), walked]
        })
    }

    #[test]
    fn default_strategy_follows_the_feature() {
        let accessor = resolve_accessor(nav!(|c: Customer| -> u32 { c.id })).unwrap();
        assert_eq!(accessor.strategy(), StrategyKind::DEFAULT);
        assert_eq!(Accessor::walked(accessor.to_expression()).unwrap().strategy(), StrategyKind::Walk);
    }

    #[test]
    fn get_and_set_nested_fields() {
        for accessor in both::<String>("c => c.address.city") {
            let mut target = customer();
            assert_eq!(accessor.get(&target).unwrap(), "London");

            accessor.set(&mut target, "Paris".into()).unwrap();
            let address = target.address.as_ref().unwrap();
            assert_eq!(address.city, "Paris");
            assert_eq!(address.zip, 10);
            assert_eq!(address.geo, Some(Geo { lat: 51.5, lon: -0.1 }));
            assert_eq!(target.billing, customer().billing);
        }
    }

    #[test]
    fn multi_level_set_leaves_the_rest_untouched() {
        for accessor in both::<f64>("c => c.address.geo.lat") {
            let mut target = customer();
            accessor.set(&mut target, 1.25).unwrap();

            let mut expected = customer();
            expected.address.as_mut().unwrap().geo.as_mut().unwrap().lat = 1.25;
            assert_eq!(target, expected);
        }
    }

    #[test]
    fn absent_intermediate_is_a_null_context() {
        for accessor in both::<f64>("c => c.address.geo.lon") {
            let mut target = customer();
            target.address.as_mut().unwrap().geo = None;

            let error = accessor.get(&target).unwrap_err();
            assert!(matches!(
                error,
                AccessError::NullContext { context: "geo", member: "lon" }
            ));
            let error = accessor.set(&mut target, 0.0).unwrap_err();
            assert!(matches!(error, AccessError::NullContext { context: "geo", .. }));

            target.address = None;
            assert!(matches!(
                accessor.get(&target),
                Err(AccessError::NullContext { context: "address", member: "geo" })
            ));
        }
    }

    #[test]
    fn properties_read_and_write() {
        for accessor in both::<String>("c => c.nickname") {
            let mut target = customer();
            assert_eq!(accessor.get(&target).unwrap(), "ada");
            accessor.set(&mut target, "countess".into()).unwrap();
            assert_eq!(target.nick, "countess");
            assert_eq!(accessor.terminal_member().kind(), MemberKind::Property);
        }

        for accessor in both::<Address>("c => c.home") {
            let mut target = customer();
            assert_eq!(accessor.get(&target).unwrap(), customer().billing);
            accessor.set(&mut target, Address::default()).unwrap();
            assert_eq!(target.billing, Address::default());
        }
    }

    #[test]
    fn failing_setter_error_passes_through() {
        for accessor in both::<String>("c => c.nickname") {
            let mut target = customer();
            let error = accessor.set(&mut target, String::new()).unwrap_err();
            assert_eq!(error.to_string(), "nickname must not be empty");
            let AccessError::Member(inner) = error else {
                panic!("expected the setter's error");
            };
            assert_eq!(inner.to_string(), "nickname must not be empty");
            assert_eq!(target.nick, "ada");
        }
    }

    #[test]
    fn not_assignable_locations_are_rejected() {
        let read_only = NavExpr::<Customer, String>::parse("c => c.billing.label").unwrap();
        let intermediate = NavExpr::<Customer, String>::parse("c => c.home.city").unwrap();

        for expr in [read_only, intermediate] {
            assert!(matches!(
                Accessor::walked(expr.clone()),
                Err(ResolveError::NotAssignable { .. })
            ));
            assert!(matches!(
                Accessor::from_expression(expr),
                Err(ResolveError::NotAssignable { .. })
            ));
        }
    }

    #[test]
    fn method_call_builds_no_accessor() {
        let expr = NavExpr::<Customer, String>::parse("c => c.name.clone()").unwrap();
        assert!(matches!(
            Accessor::from_expression(expr),
            Err(ResolveError::UnsupportedExpressionShape { .. })
        ));
    }

    #[test]
    fn equality_uses_the_terminal_member_only() {
        let state = FixedState::with_seed(3);

        let a = resolve_accessor(nav!(|c: Customer| -> String { c.billing.city })).unwrap();
        let b = resolve_accessor(nav!(|c: Customer| -> String { c.address.city })).unwrap();
        let c = resolve_accessor(nav!(|s: Supplier| -> String { s.billing.city })).unwrap();
        let zip = resolve_accessor(nav!(|c: Customer| -> u32 { c.billing.zip })).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
        assert_eq!(state.hash_one(&a), state.hash_one(&c));
        assert_ne!(a, zip);

        let walked = Accessor::walked(nav!(|c: Customer| -> String { c.billing.city })).unwrap();
        assert_eq!(a, walked);

        let mut rules: HashMap<Accessor<Customer, String>, usize, FixedState> =
            HashMap::with_hasher(FixedState::with_seed(0));
        *rules.entry(a).or_default() += 1;
        *rules.entry(b).or_default() += 1;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.values().copied().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn expressions_round_trip() {
        let expr = nav!(|c: Customer| -> String { c.address.city });
        let walked = Accessor::walked(expr.clone()).unwrap();
        let rebuilt: NavExpr<Customer, String> = (&walked).into();
        assert_eq!(rebuilt.to_string(), "root => root.address.city");

        let again = Accessor::try_from(rebuilt).unwrap();
        assert_eq!(again, walked);
        assert_eq!(again.path(), walked.path());

        crate::cfg::codegen! {
            let compiled = Accessor::compiled(expr.clone()).unwrap();
            assert_eq!(NavExpr::from(&compiled), expr);
        }
    }

    #[test]
    fn from_path_checks_the_root_and_value() {
        let source = resolve_accessor(nav!(|c: Customer| -> u32 { c.billing.zip })).unwrap();
        let path = source.path().clone();

        let rebuilt = Accessor::<Customer, u32>::from_path(path.clone()).unwrap();
        assert_eq!(rebuilt.get(&customer()).unwrap(), 20);
        assert_eq!(rebuilt, source);

        assert!(matches!(
            Accessor::<Supplier, u32>::from_path(path.clone()),
            Err(ResolveError::UnknownMember { .. })
        ));
        assert!(matches!(
            Accessor::<Customer, u64>::from_path(path),
            Err(ResolveError::ValueTypeMismatch { .. })
        ));
    }

    #[test]
    fn optional_root() {
        let expr = NavExpr::<Option<Customer>, u32>::parse("c => c.id").unwrap();
        let accessor = Accessor::from_expression(expr).unwrap();
        assert_eq!(accessor.get(&Some(customer())).unwrap(), 7);
        assert!(matches!(
            accessor.get(&None),
            Err(AccessError::NullContext { member: "id", .. })
        ));
    }

    #[test]
    fn accessors_are_send_and_sync() {
        fn check<A: Send + Sync + Clone + 'static>() {}
        check::<Accessor<Customer, String>>();
    }

    proptest! {
        #[test]
        fn set_then_get_round_trips(zip in any::<u32>(), city in "[a-zA-Z ]{0,16}") {
            for accessor in both::<u32>("c => c.address.zip") {
                let mut target = customer();
                accessor.set(&mut target, zip).unwrap();
                prop_assert_eq!(accessor.get(&target).unwrap(), zip);
            }

            for accessor in both::<String>("c => c.billing.city") {
                let mut target = customer();
                accessor.set(&mut target, city.clone()).unwrap();
                prop_assert_eq!(accessor.get(&target).unwrap(), city.clone());
            }
        }

        #[test]
        fn strategies_agree(has_address in any::<bool>(), has_geo in any::<bool>(), lat in -90.0..90.0f64) {
            let mut target = customer();
            if has_address {
                target.address.as_mut().unwrap().geo = has_geo.then(|| Geo { lat, lon: 0.0 });
            } else {
                target.address = None;
            }

            let [compiled, walked] = both::<f64>("c => c.address.geo.lat");
            let left = compiled.get(&target).map_err(|e| e.to_string());
            let right = walked.get(&target).map_err(|e| e.to_string());
            prop_assert_eq!(left, right);

            let mut left_target = target.clone();
            let mut right_target = target;
            let left = compiled.set(&mut left_target, 1.0).map_err(|e| e.to_string());
            let right = walked.set(&mut right_target, 1.0).map_err(|e| e.to_string());
            prop_assert_eq!(left, right);
            prop_assert_eq!(left_target, right_target);
        }
    }
}
