//! Reflection impls for foreign types, and the cells used to implement
//! [`Typed`](crate::info::Typed).
//!
//! ## Implemented Menu
//!
//! - opaque:
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `bool`, `char`, `String`
//!     - `Vec<T>`
//! - optional:
//!     - `Option<T>`, a context that may be absent.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod opaque;
mod option;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
