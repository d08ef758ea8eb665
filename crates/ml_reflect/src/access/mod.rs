//! Reusable accessors for nested members.
//!
//! An [`Accessor<T, V>`] is built from a navigation lambda such as
//! `c => c.address.city` and then reads or writes that value on any `T`.
//!
//! - [`NavExpr`]: the lambda, built with [`Expr`] builders, parsed from text
//!   with [`NavExpr::parse`], or written with the `nav!` macro.
//! - [`resolve`]: binds the lambda's member chain into an [`AccessPath`] of
//!   [`MemberDescriptor`]s. Anything but a pure member chain on the lambda
//!   parameter is refused.
//! - [`Accessor`]: executes the chain. With the `codegen` feature (default)
//!   the read and write callables are composed once from the functions
//!   generated by `#[derive(Reflect)]`; without it the chain is walked by
//!   member name on every call. Both behave the same.
//!
//! Accessors compare and hash by the last member of their chain only.
//!
//! `Option<_>` members are nullable contexts: reading through a `None`
//! fails with [`AccessError::NullContext`].
//!
//! # Examples
//!
//! ```
//! use ml_reflect::{access::{Accessor, AccessError}, derive::{Reflect, nav}};
//!
//! #[derive(Reflect)]
//! struct Address { city: String }
//!
//! #[derive(Reflect)]
//! struct Customer { address: Option<Address> }
//!
//! let city = Accessor::from_expression(nav!(|c: Customer| -> String { c.address.city })).unwrap();
//!
//! let mut customer = Customer { address: Some(Address { city: "Rome".into() }) };
//! city.set(&mut customer, "Turin".into()).unwrap();
//! assert_eq!(city.get(&customer).unwrap(), "Turin");
//!
//! let nobody = Customer { address: None };
//! assert!(matches!(city.get(&nobody), Err(AccessError::NullContext { .. })));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod descriptor;
mod error;
mod expr;
mod parser;
mod resolve;
mod walk;

crate::cfg::codegen! {
    mod compiled;
}

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{Accessor, StrategyKind, resolve_accessor};
pub use descriptor::{AccessPath, MemberDescriptor};
pub use error::{AccessError, MemberError, ResolveError};
pub use expr::{BinaryOp, Expr, Literal, NavExpr};
pub use parser::ParseError;
pub use resolve::resolve;
