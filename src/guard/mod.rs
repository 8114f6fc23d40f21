//! Scope guards that release a value exactly once
//!
//! A [`Guard`] owns a value and a [`Deleter`] for it. When the guard goes
//! out of scope the deleter runs on the value, once. Moving the guard moves
//! that obligation with it; the moved-from binding is dead and releases
//! nothing. Guards are never `Clone`: two owners of one cleanup obligation
//! would release twice.
//!
//! # Failure on drop
//!
//! A destructor has nobody to return an error to, so a deleter failure in
//! `Drop` panics (or is logged, if the thread is already unwinding). Whether
//! that can happen is known at compile time through
//! [`Guard::INFALLIBLE_DROP`]. Callers that want the error as a value use
//! [`Guard::release`] instead of letting the guard drop.
//!
//! The default deleter is deliberately not a no-op: a guard that was never
//! told how to release its value panics with "invalid invocation" rather
//! than leaking it.
//!
//! # Example
//!
//! ```rust
//! use cwrap::guard::Guard;
//! use std::cell::RefCell;
//!
//! let closed = RefCell::new(Vec::new());
//! {
//!     let fd = Guard::with_value(|fd: &mut i32| closed.borrow_mut().push(*fd), 3);
//!     assert_eq!(*fd.get(), 3);
//!     assert!(closed.borrow().is_empty());
//! }
//! assert_eq!(*closed.borrow(), vec![3]);
//! ```
//!
//! ## Late binding
//!
//! ```rust
//! use cwrap::guard::{Guard, LateBound};
//!
//! let mut buffer: Guard<Vec<u8>, fn(&mut Vec<u8>), LateBound<Vec<u8>>> =
//!     Guard::late(|buf: &mut Vec<u8>| buf.clear());
//! assert!(!buffer.is_bound());
//!
//! buffer.get_mut().extend_from_slice(b"hello");
//! assert!(buffer.is_bound());
//! ```

mod deleter;
mod storage;

pub use deleter::{ByRef, DefaultDeleter, Deleter, Fallible};
pub use storage::{ByValue, LateBound, Storage};

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::error::Result;

/// Owns a value of type `T` and releases it with `D` exactly once
///
/// See the [module documentation](self) for the ownership rules.
///
/// A guard can be moved but never duplicated. It is not `Clone`:
///
/// ```compile_fail
/// use cwrap::guard::Guard;
///
/// fn duplicate<T: Clone>(value: &T) -> T {
///     value.clone()
/// }
///
/// let guard = Guard::with_value(|_: &mut i32| {}, 1);
/// let _copy = duplicate(&guard);
/// ```
///
/// nor `Copy`, so a moved-from guard cannot be used again:
///
/// ```compile_fail
/// use cwrap::guard::Guard;
///
/// let first = Guard::with_value(|_: &mut i32| {}, 1);
/// let second = first;
/// let third = first;
/// ```
pub struct Guard<T, D = DefaultDeleter<T>, S = ByValue<T>>
where
    D: Deleter<T>,
    S: Storage<T>,
{
    // `None` only while the guard is being taken apart
    slot: Option<Slot<D, S>>,
    _value: PhantomData<T>,
}

struct Slot<D, S> {
    deleter: D,
    storage: S,
}

impl<D, S> Slot<D, S> {
    fn release<T>(&mut self) -> Result<()>
    where
        D: Deleter<T>,
        S: Storage<T>,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            value_type = std::any::type_name::<T>(),
            bound = self.storage.is_bound(),
            "Releasing guarded value"
        );
        // An unbound slot is released like a default-constructed by-value one
        self.deleter.delete(self.storage.get_mut())
    }
}

impl<T, D: Deleter<T>> Guard<T, D> {
    /// A guard with a default deleter around a default value.
    ///
    /// With [`DefaultDeleter`] the deleter is empty, so the guard panics on
    /// drop unless it is [disarmed](Guard::into_inner) first.
    ///
    /// Only available when the deleter has a default. A function pointer
    /// does not:
    ///
    /// ```compile_fail
    /// use cwrap::guard::Guard;
    ///
    /// let _guard: Guard<i32, fn(&mut i32)> = Guard::new();
    /// ```
    pub fn new() -> Self
    where
        T: Default,
        D: Default,
    {
        Self::from_parts(D::default(), ByValue::default())
    }

    /// A guard with `deleter` around a default value
    pub fn with_deleter(deleter: D) -> Self
    where
        T: Default,
    {
        Self::from_parts(deleter, ByValue::default())
    }

    /// A guard with `deleter` around `value`.
    ///
    /// Both are moved in; neither is cloned.
    pub fn with_value(deleter: D, value: T) -> Self {
        Self::from_parts(deleter, ByValue::from_value(value))
    }

    /// A guard with a default deleter around `value`
    pub fn from_value(value: T) -> Self
    where
        D: Default,
    {
        Self::from_parts(D::default(), ByValue::from_value(value))
    }
}

impl<T: Default, D: Deleter<T>> Guard<T, D, LateBound<T>> {
    /// A guard with `deleter` and nothing bound yet
    pub fn late(deleter: D) -> Self {
        Self::from_parts(deleter, LateBound::unbound())
    }
}

impl<T, D, S> Guard<T, D, S>
where
    D: Deleter<T>,
    S: Storage<T>,
{
    /// `true` if dropping this guard can never panic.
    ///
    /// Mirrors [`Deleter::INFALLIBLE`] of the guard's deleter.
    pub const INFALLIBLE_DROP: bool = D::INFALLIBLE;

    /// A guard from a deleter and prepared storage
    pub fn from_parts(deleter: D, storage: S) -> Self {
        Guard {
            slot: Some(Slot { deleter, storage }),
            _value: PhantomData,
        }
    }

    /// The guarded value
    pub fn get(&self) -> &T {
        self.slot().storage.get()
    }

    /// The guarded value, mutably
    pub fn get_mut(&mut self) -> &mut T {
        self.slot_mut().storage.get_mut()
    }

    /// The deleter that will release the value
    pub fn deleter(&self) -> &D {
        &self.slot().deleter
    }

    /// `false` only for late-bound storage with nothing bound yet
    pub fn is_bound(&self) -> bool {
        self.slot().storage.is_bound()
    }

    /// Release the value now and report how it went.
    ///
    /// This is the non-panicking alternative to dropping the guard.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cwrap::guard::Guard;
    ///
    /// let guard: Guard<i32> = Guard::from_value(7);
    /// let err = guard.release().unwrap_err();
    /// assert!(err.is_invalid_invocation());
    /// ```
    pub fn release(mut self) -> Result<()> {
        match self.slot.take() {
            Some(mut slot) => slot.release::<T>(),
            None => Ok(()),
        }
    }

    /// Release the current value and guard `value` instead.
    ///
    /// An unbound late-bound value is released as a default value first,
    /// the same as by-value storage built with [`Guard::with_deleter`].
    ///
    /// `value` is bound even when releasing the old value fails; the failure
    /// is returned.
    pub fn reset(&mut self, value: T) -> Result<()> {
        let slot = self.slot_mut();
        let released = slot.release::<T>();
        slot.storage = S::from_value(value);
        released
    }

    /// Disarm the guard and take the value back without releasing it.
    ///
    /// Returns `None` for late-bound storage with nothing bound.
    pub fn into_inner(mut self) -> Option<T> {
        self.slot.take().and_then(|slot| slot.storage.into_value())
    }

    fn slot(&self) -> &Slot<D, S> {
        match &self.slot {
            Some(slot) => slot,
            None => unreachable!("guard accessed after being taken apart"),
        }
    }

    fn slot_mut(&mut self) -> &mut Slot<D, S> {
        match &mut self.slot {
            Some(slot) => slot,
            None => unreachable!("guard accessed after being taken apart"),
        }
    }
}

impl<T, D, S> Default for Guard<T, D, S>
where
    D: Deleter<T> + Default,
    S: Storage<T> + Default,
{
    fn default() -> Self {
        Self::from_parts(D::default(), S::default())
    }
}

impl<T, D, S> Drop for Guard<T, D, S>
where
    D: Deleter<T>,
    S: Storage<T>,
{
    fn drop(&mut self) {
        let Some(mut slot) = self.slot.take() else {
            return;
        };
        if let Err(err) = slot.release::<T>() {
            if std::thread::panicking() {
                #[cfg(feature = "tracing")]
                tracing::error!("Guard cleanup failed during unwinding: {}", err);
                #[cfg(not(feature = "tracing"))]
                eprintln!("Guard cleanup failed during unwinding: {}", err);
            } else {
                debug_assert!(
                    !D::INFALLIBLE,
                    "deleter {} is declared infallible but failed: {}",
                    std::any::type_name::<D>(),
                    err
                );
                panic!("guard cleanup failed: {}", err);
            }
        }
    }
}

impl<T, D, S> Deref for Guard<T, D, S>
where
    D: Deleter<T>,
    S: Storage<T>,
{
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T, D, S> DerefMut for Guard<T, D, S>
where
    D: Deleter<T>,
    S: Storage<T>,
{
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T, D, S> fmt::Debug for Guard<T, D, S>
where
    D: Deleter<T>,
    S: Storage<T> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Guard");
        if let Some(slot) = &self.slot {
            out.field("storage", &slot.storage);
        }
        out.field("deleter", &std::any::type_name::<D>()).finish()
    }
}

/// Guard `value` in place, releasing it with `release`.
///
/// # Example
///
/// ```rust
/// let mut log = Vec::new();
/// {
///     let mut buf = cwrap::guard(vec![1, 2, 3], |v: &mut Vec<i32>| v.clear());
///     buf.push(4);
///     log.extend(buf.iter().copied());
/// }
/// assert_eq!(log, vec![1, 2, 3, 4]);
/// ```
pub fn guard<T, F>(value: T, release: F) -> Guard<T, F>
where
    F: FnMut(&mut T),
{
    Guard::with_value(release, value)
}
