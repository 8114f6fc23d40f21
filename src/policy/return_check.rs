//! Built-in return-check policies
//!
//! - [`IsZero`]: `rv == 0` (POSIX `close`, `pthread_*`, most "status" APIs)
//! - [`IsNotZero`]: `rv != 0` (OpenSSL-style "1 means success")
//! - [`IsNotNegative`]: `rv >= 0` (file descriptors, byte counts)
//! - [`IsNotNull`]: the pointer is not null (constructors like `malloc`)
//! - [`IsErrnoZero`]: errno is still `0` after the call
//!
//! # Example
//!
//! ```rust
//! use cwrap::policy::{IsNotNull, IsZero, ReturnCheckPolicy};
//!
//! assert!(IsZero::return_value_is_ok(&0u32));
//! assert!(!IsZero::return_value_is_ok(&-1i32));
//!
//! let value = 1u8;
//! assert!(IsNotNull::return_value_is_ok(&(&value as *const u8)));
//! assert!(!IsNotNull::return_value_is_ok(&std::ptr::null::<u8>()));
//! ```

use super::errno;
use super::integer::{Integer, Nullable, SignedInteger};
use super::ReturnCheckPolicy;

/// Success is a return value of zero
///
/// Integers only. A pointer return has no "zero" worth checking for:
///
/// ```compile_fail
/// use cwrap::policy::{IsZero, ReturnCheckPolicy};
///
/// IsZero::return_value_is_ok(&std::ptr::null::<u8>());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsZero;

/// Success is any non-zero return value
///
/// Only signed returns are accepted: an API that reports errors through a
/// zero return usually reports them through a negative one too.
///
/// ```compile_fail
/// use cwrap::policy::{IsNotZero, ReturnCheckPolicy};
///
/// IsNotZero::return_value_is_ok(&1u32);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNotZero;

/// Success is any return value `>= 0`
///
/// Signed integers only; every unsigned value would pass:
///
/// ```compile_fail
/// use cwrap::policy::{IsNotNegative, ReturnCheckPolicy};
///
/// IsNotNegative::return_value_is_ok(&3u32);
/// ```
///
/// The same holds through a checked call:
///
/// ```compile_fail
/// use cwrap::check::CallCheckContext;
/// use cwrap::policy::{IsNotNegative, ReportReturnValue};
///
/// fn count() -> usize { 0 }
///
/// let _ = CallCheckContext::<IsNotNegative, ReportReturnValue>::call_checked(count, ());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNotNegative;

/// Success is a non-null pointer, or a `Some`
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNotNull;

/// Success is errno still being `0` after the call
///
/// Its pre-call hook clears errno, so a stale value left behind by an
/// earlier call is never mistaken for a failure. Works with any return type.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsErrnoZero;

impl<Rv: Integer> ReturnCheckPolicy<Rv> for IsZero {
    #[inline]
    fn return_value_is_ok(rv: &Rv) -> bool {
        rv.is_zero()
    }

    fn description() -> &'static str {
        "zero return value"
    }
}

impl<Rv: SignedInteger> ReturnCheckPolicy<Rv> for IsNotZero {
    #[inline]
    fn return_value_is_ok(rv: &Rv) -> bool {
        !rv.is_zero()
    }

    fn description() -> &'static str {
        "non-zero return value"
    }
}

impl<Rv: SignedInteger> ReturnCheckPolicy<Rv> for IsNotNegative {
    #[inline]
    fn return_value_is_ok(rv: &Rv) -> bool {
        !rv.is_negative()
    }

    fn description() -> &'static str {
        "non-negative return value (>= 0)"
    }
}

impl<Rv: Nullable> ReturnCheckPolicy<Rv> for IsNotNull {
    #[inline]
    fn return_value_is_ok(rv: &Rv) -> bool {
        !rv.is_null_value()
    }

    fn description() -> &'static str {
        "non-null return value"
    }
}

impl<Rv> ReturnCheckPolicy<Rv> for IsErrnoZero {
    #[inline]
    fn pre_call() {
        errno::clear_errno();
    }

    #[inline]
    fn return_value_is_ok(_rv: &Rv) -> bool {
        errno::errno() == 0
    }

    fn description() -> &'static str {
        "errno unchanged by the call"
    }
}
