//! Checked calls: invoke a C-style function and check what it returned
//!
//! A checked call runs five steps:
//!
//! 1. the return-check policy's pre-call hook,
//! 2. the callable, with its arguments moved in,
//! 3. the return-check policy on the return value,
//! 4. on rejection, the error policy, whose error comes back as `Err`,
//! 5. on acceptance, the return value, unchanged, as `Ok`.
//!
//! Three entry points share this sequence:
//!
//! - [`call_checked`] names both policies at the call site,
//! - [`CallGuard`] binds a callable and both policies once,
//! - [`CallCheckContext`] names a policy pair once for many callables.
//!
//! # Example
//!
//! ```rust
//! use cwrap::check::call_checked;
//! use cwrap::policy::{IsZero, ReportReturnValue};
//!
//! fn set_flag(flag: i32) -> i32 {
//!     if flag >= 0 { 0 } else { -1 }
//! }
//!
//! let rv = call_checked::<IsZero, ReportReturnValue, _, _>(set_flag, (1,));
//! assert_eq!(rv.unwrap(), 0);
//!
//! let err = call_checked::<IsZero, ReportReturnValue, _, _>(set_flag, (-1,)).unwrap_err();
//! assert_eq!(err.to_string(), "return value indicated error: -1");
//! ```

mod call_guard;
mod context;
mod invoke;

pub use call_guard::CallGuard;
pub use context::CallCheckContext;
pub use invoke::Invoke;

use crate::policy::{ErrorPolicy, ReturnCheckPolicy};

/// Call `callable` with `args` and check its return value.
///
/// `R` decides whether the return value means success and `E` builds the
/// error when it does not. `E` runs at most once per call and only on
/// rejection.
///
/// # Example
///
/// ```rust
/// use cwrap::check::call_checked;
/// use cwrap::policy::{IsNotNull, ReportReturnValue};
///
/// let data = [1u8, 2, 3];
/// let find = |needle: u8| -> *const u8 {
///     data.iter().find(|&&b| b == needle).map_or(std::ptr::null(), |b| b as *const u8)
/// };
///
/// let found = call_checked::<IsNotNull, ReportReturnValue, _, _>(find, (2,)).unwrap();
/// assert_eq!(found, &data[1] as *const u8);
///
/// assert!(call_checked::<IsNotNull, ReportReturnValue, _, _>(find, (9,)).is_err());
/// ```
pub fn call_checked<R, E, F, Args>(mut callable: F, args: Args) -> Result<F::Output, E::Error>
where
    F: Invoke<Args>,
    R: ReturnCheckPolicy<F::Output>,
    E: ErrorPolicy<F::Output>,
{
    invoke_checked::<R, E, F, Args>(&mut callable, args)
}

/// The checked-call sequence, borrowing the callable
pub(crate) fn invoke_checked<R, E, F, Args>(
    callable: &mut F,
    args: Args,
) -> Result<F::Output, E::Error>
where
    F: Invoke<Args> + ?Sized,
    R: ReturnCheckPolicy<F::Output>,
    E: ErrorPolicy<F::Output>,
{
    R::pre_call();
    let rv = callable.invoke(args);
    if R::return_value_is_ok(&rv) {
        Ok(rv)
    } else {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            policy = R::description(),
            return_type = std::any::type_name::<F::Output>(),
            "Checked call rejected return value"
        );
        Err(E::handle_error(&rv))
    }
}
