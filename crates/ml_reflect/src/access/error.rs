use alloc::boxed::Box;
use alloc::string::String;
use core::error::Error;
use core::fmt;

// -----------------------------------------------------------------------------
// MemberError

/// An error raised by a user-supplied property getter or setter.
///
/// It travels through [`AccessError::Member`] without being wrapped or
/// rewritten, so callers can downcast it back to their own error type.
///
/// ```
/// use ml_reflect::access::MemberError;
///
/// #[derive(Debug)]
/// struct Frozen;
///
/// impl core::fmt::Display for Frozen {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         f.write_str("the record is frozen")
///     }
/// }
///
/// impl core::error::Error for Frozen {}
///
/// let error = MemberError::new(Frozen);
/// assert!(error.downcast_ref::<Frozen>().is_some());
/// assert_eq!(error.to_string(), "the record is frozen");
/// ```
pub struct MemberError(Box<dyn Error + Send + Sync>);

impl MemberError {
    /// Wraps a user error.
    #[inline]
    pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self(Box::new(error))
    }

    /// Returns the inner error if it is an `E`.
    #[inline]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Unwraps the boxed user error.
    #[inline]
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync> {
        self.0
    }
}

impl From<Box<dyn Error + Send + Sync>> for MemberError {
    #[inline]
    fn from(value: Box<dyn Error + Send + Sync>) -> Self {
        Self(value)
    }
}

impl From<&str> for MemberError {
    #[inline]
    fn from(value: &str) -> Self {
        Self(Box::from(value))
    }
}

impl From<String> for MemberError {
    #[inline]
    fn from(value: String) -> Self {
        Self(Box::from(value))
    }
}

impl fmt::Debug for MemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for MemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for MemberError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

// -----------------------------------------------------------------------------
// AccessError

/// A failure of [`Accessor::get`] or [`Accessor::set`].
///
/// [`Accessor::get`]: crate::access::Accessor::get
/// [`Accessor::set`]: crate::access::Accessor::set
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AccessError {
    /// An intermediate value of the chain is `None`.
    ///
    /// `context` is the member that produced the absent value, or the root
    /// type path when the target itself is `None`.
    #[error("Cannot read `{member}`: `{context}` is absent")]
    NullContext {
        context: &'static str,
        member: &'static str,
    },

    /// The runtime value is not the type that declares the member.
    #[error("Type `{type_path}` has no member `{member}`")]
    MemberNotFound {
        type_path: &'static str,
        member: &'static str,
    },

    /// A value handed to a setter is not of the member's type.
    #[error("Type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The getter or setter of a property failed.
    #[error(transparent)]
    Member(#[from] MemberError),
}

// -----------------------------------------------------------------------------
// ResolveError

/// A navigation expression that cannot become an [`Accessor`].
///
/// Raised once, at construction. An expression that fails keeps failing.
///
/// [`Accessor`]: crate::access::Accessor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The body is not a pure member chain on the lambda parameter.
    #[error("Unsupported expression `{expression}`: {reason}")]
    UnsupportedExpressionShape {
        expression: String,
        reason: &'static str,
    },

    /// A name of the chain is not a member of the type it is read on.
    #[error("Type `{type_path}` has no member `{member}`")]
    UnknownMember {
        type_path: &'static str,
        member: String,
    },

    /// The last member does not produce the accessor's value type.
    #[error("Value type mismatch: the chain ends in `{found}`, expected `{expected}`")]
    ValueTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The body cannot be written to.
    #[error("Member `{member}` is not assignable: {reason}")]
    NotAssignable {
        member: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{AccessError, MemberError};

    #[test]
    fn member_error_is_transparent() {
        let error = AccessError::from(MemberError::from("rejected"));
        assert_eq!(error.to_string(), "rejected");

        let AccessError::Member(inner) = error else {
            panic!("expected a member error");
        };
        assert_eq!(inner.to_string(), "rejected");
    }

    #[test]
    fn null_context_names_the_absent_member() {
        let error = AccessError::NullContext {
            context: "address",
            member: "city",
        };
        assert_eq!(error.to_string(), "Cannot read `city`: `address` is absent");
    }
}
