#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    ml_cfg::define_alias! {
        #[cfg(feature = "codegen")] => codegen,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// The derive macros emit `::ml_reflect::...` paths. Inside this crate (unit
// tests included) that path must resolve to `crate`.
extern crate self as ml_reflect;

// -----------------------------------------------------------------------------
// no_std support

// Type info cells rely on `std::sync`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod access;
pub mod impls;
pub mod info;
pub mod ops;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use reflection::Reflect;
pub use ml_reflect_derive as derive;
