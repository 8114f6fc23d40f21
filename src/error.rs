//! Errors raised by guards and checked calls
//!
//! Every runtime failure in this crate is an [`Error`]. There are four
//! sources:
//!
//! - an empty [`DefaultDeleter`](crate::guard::DefaultDeleter) was asked to
//!   clean up ([`Error::InvalidInvocation`]),
//! - a wrapped call returned a value its return-check policy rejected
//!   ([`Error::ReturnValue`] or [`Error::Os`], depending on the error policy),
//! - a fallible deleter reported a failure ([`Error::Release`]).
//!
//! Misusing a policy on the wrong return type is not an [`Error`]; it does
//! not compile.
//!
//! # Examples
//!
//! ```
//! use cwrap::Error;
//!
//! let err = Error::return_value(&-1);
//! assert_eq!(err.to_string(), "return value indicated error: -1");
//!
//! let err = Error::from_error_code(libc::ENOENT);
//! assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
//! ```

use std::fmt;
use std::io;

/// Result alias used throughout cwrap
pub type Result<T> = std::result::Result<T, Error>;

/// A failure raised by a guard or a checked call
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A deleter with no release function was invoked.
    ///
    /// Raised instead of silently leaking the guarded resource.
    #[error("invalid invocation: deleter has no release function")]
    InvalidInvocation,

    /// A return value failed its return-check policy.
    #[error("return value indicated error: {value}")]
    ReturnValue {
        /// `Debug` rendering of the rejected return value
        value: String,
    },

    /// Platform error, looked up from errno or a returned error code.
    #[error(transparent)]
    Os(#[from] io::Error),

    /// A fallible deleter failed to release its value.
    #[error("release failed: {0}")]
    Release(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Build a [`Error::ReturnValue`] carrying `rv`.
    pub fn return_value<Rv: fmt::Debug + ?Sized>(rv: &Rv) -> Self {
        Error::ReturnValue {
            value: format!("{:?}", rv),
        }
    }

    /// Capture the calling thread's current errno.
    pub fn last_os_error() -> Self {
        Error::Os(io::Error::last_os_error())
    }

    /// Build an [`Error::Os`] from a positive error code such as `libc::EINVAL`.
    pub fn from_error_code(code: i32) -> Self {
        Error::Os(io::Error::from_raw_os_error(code))
    }

    /// Wrap a deleter failure.
    pub fn release<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Release(source.into())
    }

    /// `true` for [`Error::InvalidInvocation`].
    pub fn is_invalid_invocation(&self) -> bool {
        matches!(self, Error::InvalidInvocation)
    }

    /// The OS error code, if this error came from the platform.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::Os(err) => err.raw_os_error(),
            _ => None,
        }
    }
}
