use std::fmt;
use std::marker::PhantomData;

use super::call_guard::CallGuard;
use super::invoke::Invoke;
use super::invoke_checked;
use crate::policy::{DefaultErrorPolicy, DefaultReturnCheck, ErrorPolicy, ReturnCheckPolicy};

/// A named pairing of one return-check policy and one error policy.
///
/// Libraries tend to use one convention throughout, so a context is usually
/// declared once as a type alias and reused for every call into that
/// library.
///
/// # Example
///
/// ```rust
/// use cwrap::check::CallCheckContext;
/// use cwrap::policy::{IsNotNull, IsNotZero, ReportReturnValue};
///
/// // "1 on success" functions, and constructors returning pointers
/// type Ct = CallCheckContext<IsNotZero, ReportReturnValue>;
/// type CtPtr = CallCheckContext<IsNotNull, ReportReturnValue>;
///
/// fn status_ok() -> i32 { 1 }
/// fn new_buffer() -> *mut u8 { std::ptr::null_mut() }
///
/// assert_eq!(Ct::call_checked(status_ok, ()).unwrap(), 1);
/// assert!(CtPtr::call_checked(new_buffer, ()).is_err());
/// ```
pub struct CallCheckContext<R = DefaultReturnCheck, E = DefaultErrorPolicy>(
    PhantomData<fn() -> (R, E)>,
);

impl<R, E> CallCheckContext<R, E> {
    /// Call `callable` with `args` under this context's policies.
    pub fn call_checked<F, Args>(mut callable: F, args: Args) -> Result<F::Output, E::Error>
    where
        F: Invoke<Args>,
        R: ReturnCheckPolicy<F::Output>,
        E: ErrorPolicy<F::Output>,
    {
        invoke_checked::<R, E, F, Args>(&mut callable, args)
    }

    /// Bind `callable` to this context's policies for repeated calls.
    pub fn bind<F>(callable: F) -> CallGuard<F, R, E> {
        CallGuard::new(callable)
    }
}

impl<R, E> Default for CallCheckContext<R, E> {
    fn default() -> Self {
        CallCheckContext(PhantomData)
    }
}

impl<R, E> Clone for CallCheckContext<R, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, E> Copy for CallCheckContext<R, E> {}

impl<R, E> fmt::Debug for CallCheckContext<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CallCheckContext<{}, {}>",
            std::any::type_name::<R>(),
            std::any::type_name::<E>()
        )
    }
}
