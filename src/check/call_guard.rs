use std::fmt;
use std::marker::PhantomData;

use super::invoke::Invoke;
use super::invoke_checked;
use crate::policy::{DefaultErrorPolicy, DefaultReturnCheck, ErrorPolicy, ReturnCheckPolicy};

/// A callable with its return-check and error policies bound once.
///
/// Every [`call`](CallGuard::call) runs the full checked-call sequence,
/// including the pre-call hook, so repeated calls through the same guard
/// behave exactly like repeated [`call_checked`](super::call_checked) calls.
///
/// # Example
///
/// ```rust
/// use cwrap::check::CallGuard;
/// use cwrap::policy::{IsNotNegative, ReportReturnValue};
///
/// fn checked_div(a: i32, b: i32) -> i32 {
///     if b == 0 { -1 } else { a / b }
/// }
///
/// let mut div = CallGuard::<_, IsNotNegative, ReportReturnValue>::new(checked_div);
/// assert_eq!(div.call((10, 2)).unwrap(), 5);
/// assert!(div.call((10, 0)).is_err());
/// ```
pub struct CallGuard<F, R = DefaultReturnCheck, E = DefaultErrorPolicy> {
    callable: F,
    _policies: PhantomData<fn() -> (R, E)>,
}

impl<F, R, E> CallGuard<F, R, E> {
    /// Bind `callable` to the policies `R` and `E`.
    pub fn new(callable: F) -> Self {
        CallGuard {
            callable,
            _policies: PhantomData,
        }
    }

    /// Call the bound callable with `args` and check its return value.
    pub fn call<Args>(&mut self, args: Args) -> Result<F::Output, E::Error>
    where
        F: Invoke<Args>,
        R: ReturnCheckPolicy<F::Output>,
        E: ErrorPolicy<F::Output>,
    {
        invoke_checked::<R, E, F, Args>(&mut self.callable, args)
    }

    /// The bound callable
    pub fn get_ref(&self) -> &F {
        &self.callable
    }

    /// Unbind and return the callable
    pub fn into_inner(self) -> F {
        self.callable
    }
}

impl<F: Default, R, E> Default for CallGuard<F, R, E> {
    fn default() -> Self {
        CallGuard::new(F::default())
    }
}

impl<F: Clone, R, E> Clone for CallGuard<F, R, E> {
    fn clone(&self) -> Self {
        CallGuard::new(self.callable.clone())
    }
}

impl<F, R, E> fmt::Debug for CallGuard<F, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallGuard")
            .field("callable", &std::any::type_name::<F>())
            .field("return_check", &std::any::type_name::<R>())
            .field("error_policy", &std::any::type_name::<E>())
            .finish()
    }
}
