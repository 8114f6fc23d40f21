//! # cwrap
//!
//! Safe ownership and checked calls for C-style APIs.
//!
//! C libraries hand out resources that must be released exactly once, and
//! report failure through return values whose meaning differs from one
//! library to the next. cwrap covers both halves:
//!
//! - [`Guard`] owns a value and releases it with a deleter when dropped.
//!   Guards move but never copy, so the release happens once.
//! - [`call_checked`], [`CallGuard`] and [`CallCheckContext`] call a function
//!   and turn its return value into a `Result`, according to policies chosen
//!   at compile time.
//!
//! ## Quick Example
//!
//! ```rust
//! use cwrap::check::CallCheckContext;
//! use cwrap::policy::{ErrorCodeError, IsNotNegative};
//! use cwrap::Guard;
//!
//! // A library whose functions return a handle or a negative error code
//! type Lib = CallCheckContext<IsNotNegative, ErrorCodeError>;
//!
//! fn lib_open(name: &str) -> i32 {
//!     if name.is_empty() { -libc::ENOENT } else { 3 }
//! }
//! fn lib_close(_handle: &mut i32) {}
//!
//! let handle = Lib::call_checked(lib_open, ("config",)).unwrap();
//! let handle = Guard::with_value(lib_close as fn(&mut i32), handle);
//! assert_eq!(*handle, 3);
//!
//! let err = Lib::call_checked(lib_open, ("",)).unwrap_err();
//! assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events for rejected calls and cleanup.
//! - `proptest`: strategies for return codes and errno values in
//!   [`testing`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod check;
pub mod error;
pub mod guard;
pub mod policy;
pub mod testing;

// Re-exports
pub use check::{call_checked, CallCheckContext, CallGuard};
pub use error::{Error, Result};
pub use guard::{guard, Guard};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::check::{call_checked, CallCheckContext, CallGuard};
    pub use crate::error::{Error, Result};
    pub use crate::guard::{guard, ByRef, DefaultDeleter, Deleter, Fallible, Guard, LateBound};
    pub use crate::policy::{
        ErrnoError, ErrorCodeError, ErrorPolicy, IsErrnoZero, IsNotNegative, IsNotNull,
        IsNotZero, IsZero, PanicOnError, ReportReturnValue, ReturnCheckPolicy,
    };
}
