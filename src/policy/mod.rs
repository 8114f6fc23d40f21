//! Return-check and error policies for checked calls
//!
//! C APIs report failure through their return value, but every library picks
//! its own convention: `0` on success, non-zero on success, a negative errno,
//! a null pointer, or "look at errno afterwards". A policy pair describes one
//! convention:
//!
//! - a [`ReturnCheckPolicy`] decides whether a return value means success,
//!   and may run a hook just before the call,
//! - an [`ErrorPolicy`] turns a rejected return value into an error.
//!
//! Policies are stateless zero-sized types. They are selected as type
//! parameters and carry no runtime cost. A policy only accepts the return
//! types it makes sense for: [`IsNotNegative`] on an unsigned type, or
//! [`IsZero`] on a pointer, fails to compile.
//!
//! # Example
//!
//! ```rust
//! use cwrap::policy::{ErrorPolicy, IsNotNegative, ReportReturnValue, ReturnCheckPolicy};
//!
//! assert!(IsNotNegative::return_value_is_ok(&3i32));
//! assert!(!IsNotNegative::return_value_is_ok(&-1i32));
//!
//! let err = <ReportReturnValue as ErrorPolicy<i32>>::handle_error(&-1);
//! assert_eq!(err.to_string(), "return value indicated error: -1");
//! ```
//!
//! # Custom Policies
//!
//! ```rust
//! use cwrap::policy::ReturnCheckPolicy;
//!
//! /// `write(2)`-style: anything but -1 is a byte count
//! pub struct NotMinusOne;
//!
//! impl ReturnCheckPolicy<isize> for NotMinusOne {
//!     fn return_value_is_ok(rv: &isize) -> bool {
//!         *rv != -1
//!     }
//! }
//!
//! assert!(NotMinusOne::return_value_is_ok(&0));
//! assert!(!NotMinusOne::return_value_is_ok(&-1));
//! ```

mod combinators;
pub mod errno;
mod error_policy;
mod integer;
mod return_check;

pub use combinators::{And, Not, Or};
pub use error_policy::{ErrnoError, ErrorCodeError, PanicOnError, ReportReturnValue};
pub use integer::{Integer, Nullable, SignedInteger};
pub use return_check::{IsErrnoZero, IsNotNegative, IsNotNull, IsNotZero, IsZero};

/// Policy used when a call site does not name a return-check policy
pub type DefaultReturnCheck = IsZero;

/// Policy used when a call site does not name an error policy
pub type DefaultErrorPolicy = ReportReturnValue;

/// Decides whether a return value of type `Rv` signals success.
///
/// Implementations are stateless; everything happens in associated
/// functions so the policy can be named as a type parameter and never
/// instantiated.
pub trait ReturnCheckPolicy<Rv> {
    /// Runs immediately before the wrapped call.
    ///
    /// The default does nothing. [`IsErrnoZero`] uses it to clear errno.
    #[inline]
    fn pre_call() {}

    /// `true` if `rv` means the call succeeded
    fn return_value_is_ok(rv: &Rv) -> bool;

    /// Human-readable description of what the policy accepts
    fn description() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Turns a rejected return value into an error.
///
/// The handler is only invoked once a [`ReturnCheckPolicy`] has rejected
/// `rv`. Whatever it returns is handed back to the caller as `Err`, so the
/// failed call never looks like a success. A handler that cannot produce an
/// error (see [`PanicOnError`]) diverges instead.
pub trait ErrorPolicy<Rv> {
    /// Error produced for a rejected return value
    type Error;

    /// Build the error for `rv`
    fn handle_error(rv: &Rv) -> Self::Error;
}
