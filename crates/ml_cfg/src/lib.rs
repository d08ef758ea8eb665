//! Compile-time configuration aliases.
//!
//! A crate declares its flags once with [`define_alias!`]:
//!
//! ```
//! mod cfg {
//!     ml_cfg::define_alias! {
//!         #[cfg(test)] => testing,
//!         #[cfg(debug_assertions)] => debug,
//!     }
//! }
//!
//! // Item position: expands the tokens only when the flag is on.
//! cfg::debug! {
//!     fn only_in_debug() {}
//! }
//!
//! // Expression position: picks a branch at compile time.
//! let strategy = cfg::debug!(if { "checked" } else { "fast" });
//! # let _ = strategy;
//!
//! // Bare call: the flag as a `bool` constant.
//! const DEBUG: bool = cfg::debug!();
//! # let _ = DEBUG;
//! ```
//!
//! Each alias is a re-export of either [`enabled`] or [`disabled`], so the
//! check itself is resolved once, where the alias is defined.
#![no_std]

/// Declares configuration aliases.
///
/// Syntax: `#[cfg(predicate)] => alias_name`, comma separated.
///
/// See the [crate documentation](crate) for the generated macro forms.
#[macro_export]
macro_rules! define_alias {
    ($(#[cfg($meta:meta)] => $alias:ident),+ $(,)?) => {
        $(
            #[cfg($meta)]
            #[doc(inline)]
            #[allow(unused_imports)]
            pub use $crate::enabled as $alias;

            #[cfg(not($meta))]
            #[doc(inline)]
            #[allow(unused_imports)]
            pub use $crate::disabled as $alias;
        )+
    };
}

/// The expansion of an alias whose predicate holds.
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($then:tt)* } else { $($else:tt)* }) => {{ $($then)* }};
    ($($tokens:tt)*) => { $($tokens)* };
}

/// The expansion of an alias whose predicate does not hold.
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($then:tt)* } else { $($else:tt)* }) => {{ $($else)* }};
    ($($tokens:tt)*) => {};
}

#[cfg(test)]
mod tests {
    mod cfg {
        crate::define_alias! {
            #[cfg(test)] => on,
            #[cfg(not(test))] => off,
        }
    }

    #[test]
    fn bool_form() {
        assert!(cfg::on!());
        assert!(!cfg::off!());
    }

    #[test]
    fn branch_form() {
        assert_eq!(cfg::on!(if { 1 } else { 2 }), 1);
        assert_eq!(cfg::off!(if { 1 } else { 2 }), 2);
    }

    cfg::on! {
        fn present() -> u8 {
            7
        }
    }

    cfg::off! {
        fn present() -> u8 {
            0
        }
    }

    #[test]
    fn item_form() {
        assert_eq!(present(), 7);
    }
}
