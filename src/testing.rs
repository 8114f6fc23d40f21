//! Testing utilities for guarded resources and checked calls
//!
//! # Examples
//!
//! ## Counting releases
//!
//! ```rust
//! use cwrap::testing::ReleaseCounter;
//!
//! let counter = ReleaseCounter::new();
//! {
//!     let _a = cwrap::guard(1, counter.deleter());
//!     let _b = cwrap::guard("handle", counter.deleter());
//! }
//! assert_eq!(counter.count(), 2);
//! ```
//!
//! ## Assertion macros
//!
//! ```rust
//! use cwrap::{assert_checked_err, assert_checked_ok, call_checked};
//! use cwrap::policy::{IsZero, ReportReturnValue};
//!
//! fn status(code: i32) -> i32 { code }
//!
//! assert_checked_ok!(call_checked::<IsZero, ReportReturnValue, _, _>(status, (0,)));
//! assert_checked_ok!(call_checked::<IsZero, ReportReturnValue, _, _>(status, (0,)), 0);
//! assert_checked_err!(call_checked::<IsZero, ReportReturnValue, _, _>(status, (-1,)));
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// Counts how many times its deleters ran.
///
/// Every deleter handed out by one counter (and its clones) bumps the same
/// count, so a test can check that a group of guards released exactly as
/// often as expected.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter {
    count: Rc<Cell<usize>>,
}

impl ReleaseCounter {
    /// A counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A deleter for any `T` that only counts.
    pub fn deleter<T: ?Sized>(&self) -> impl FnMut(&mut T) {
        let count = Rc::clone(&self.count);
        move |_| count.set(count.get() + 1)
    }

    /// Releases seen so far
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

/// Assert that a checked call passed, optionally comparing the value.
///
/// # Example
///
/// ```rust
/// use cwrap::assert_checked_ok;
/// use cwrap::check::CallCheckContext;
///
/// assert_checked_ok!(<CallCheckContext>::call_checked(|| 0, ()), 0);
/// ```
#[macro_export]
macro_rules! assert_checked_ok {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Ok(_) => {}
            ::core::result::Result::Err(e) => {
                panic!("Expected checked call to pass, got error: {}", e);
            }
        }
    };
    ($result:expr, $expected:expr) => {
        match $result {
            ::core::result::Result::Ok(value) => {
                assert_eq!(value, $expected);
            }
            ::core::result::Result::Err(e) => {
                panic!(
                    "Expected checked call to return {:?}, got error: {}",
                    $expected, e
                );
            }
        }
    };
}

/// Assert that a checked call was rejected.
///
/// # Example
///
/// ```rust
/// use cwrap::assert_checked_err;
/// use cwrap::check::CallCheckContext;
///
/// assert_checked_err!(<CallCheckContext>::call_checked(|| -1, ()));
/// ```
#[macro_export]
macro_rules! assert_checked_err {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Err(_) => {}
            ::core::result::Result::Ok(value) => {
                panic!("Expected checked call to fail, got Ok: {:?}", value);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

/// Return codes a "zero or positive on success" function uses to fail
#[cfg(feature = "proptest")]
pub fn failing_return_codes() -> impl Strategy<Value = i32> {
    i32::MIN..0
}

/// Positive `errno` values
///
/// Kept below 4096, the range Linux reserves for error codes.
#[cfg(feature = "proptest")]
pub fn errno_values() -> impl Strategy<Value = i32> {
    1..4096
}
