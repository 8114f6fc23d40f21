//! Built-in error policies
//!
//! - [`ReportReturnValue`]: report the rejected value itself
//! - [`ErrnoError`]: report the platform error behind the current errno
//! - [`ErrorCodeError`]: treat the value as a negated errno (`-EINVAL`)
//! - [`PanicOnError`]: log and panic with another policy's error

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use super::integer::SignedInteger;
use super::ErrorPolicy;
use crate::error::Error;

/// Report the rejected return value
///
/// The default error policy. Produces [`Error::ReturnValue`] with the
/// value's `Debug` rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportReturnValue;

/// Report the platform error for the current errno
///
/// Pairs with APIs that return a sentinel (`-1`, `NULL`) and leave the
/// reason in errno.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrnoError;

/// Report `-rv` as a platform error code
///
/// For kernel-style APIs that return `-errno` on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorCodeError;

/// Log and panic with the error built by `P`
///
/// For call sites where a failed call means the program cannot continue.
/// Its error type is [`Infallible`], so a checked call using it can be
/// unwrapped with `let Ok(rv) = …;`.
#[derive(Clone, Copy, Default)]
pub struct PanicOnError<P = ReportReturnValue>(PhantomData<P>);

impl<P> fmt::Debug for PanicOnError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PanicOnError<{}>", std::any::type_name::<P>())
    }
}

impl<Rv: fmt::Debug> ErrorPolicy<Rv> for ReportReturnValue {
    type Error = Error;

    fn handle_error(rv: &Rv) -> Error {
        Error::return_value(rv)
    }
}

impl<Rv> ErrorPolicy<Rv> for ErrnoError {
    type Error = Error;

    fn handle_error(_rv: &Rv) -> Error {
        Error::last_os_error()
    }
}

impl<Rv: SignedInteger> ErrorPolicy<Rv> for ErrorCodeError {
    type Error = Error;

    fn handle_error(rv: &Rv) -> Error {
        match rv.negated_code() {
            Some(code) => Error::from_error_code(code),
            // Not representable as an OS error code
            None => Error::return_value(rv),
        }
    }
}

impl<Rv, P> ErrorPolicy<Rv> for PanicOnError<P>
where
    P: ErrorPolicy<Rv>,
    P::Error: fmt::Display,
{
    type Error = Infallible;

    fn handle_error(rv: &Rv) -> Infallible {
        let err = P::handle_error(rv);
        #[cfg(feature = "tracing")]
        tracing::error!("Checked call failed, aborting: {}", err);
        panic!("checked call failed: {}", err)
    }
}
