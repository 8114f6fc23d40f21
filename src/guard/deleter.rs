//! Cleanup actions for guarded values
//!
//! A [`Deleter`] releases whatever a guard holds. Three kinds ship with the
//! crate:
//!
//! - any `FnMut(&mut T)`: functions, function pointers, closures. These
//!   cannot report failure, so a guard using one never panics on drop.
//! - [`Fallible`]: wraps an `FnMut(&mut T) -> Result<(), E>` whose failure is
//!   surfaced as [`Error::Release`].
//! - [`DefaultDeleter`]: a boxed release function that may be missing.
//!   Invoking it while empty is an [`Error::InvalidInvocation`], never a
//!   silent no-op.

use std::fmt;

use crate::error::{Error, Result};

/// Releases a value of type `T`.
///
/// Implement this on your own type for a stateful deleter.
///
/// # Example
///
/// ```rust
/// use cwrap::guard::{Deleter, Guard};
///
/// struct ReturnToPool<'a> {
///     pool: &'a std::cell::RefCell<Vec<u32>>,
/// }
///
/// impl Deleter<u32> for ReturnToPool<'_> {
///     const INFALLIBLE: bool = true;
///
///     fn delete(&mut self, value: &mut u32) -> cwrap::Result<()> {
///         self.pool.borrow_mut().push(*value);
///         Ok(())
///     }
/// }
///
/// let pool = std::cell::RefCell::new(Vec::new());
/// {
///     let _handle = Guard::with_value(ReturnToPool { pool: &pool }, 42u32);
/// }
/// assert_eq!(*pool.borrow(), vec![42]);
/// ```
pub trait Deleter<T: ?Sized> {
    /// `true` if [`delete`](Deleter::delete) never returns `Err`.
    ///
    /// A guard over an infallible deleter never panics when dropped. A
    /// deleter that sets this and then fails breaks that contract; debug
    /// builds catch it when the guard drops.
    const INFALLIBLE: bool = false;

    /// Release `value`
    fn delete(&mut self, value: &mut T) -> Result<()>;
}

impl<T: ?Sized, F> Deleter<T> for F
where
    F: FnMut(&mut T),
{
    const INFALLIBLE: bool = true;

    #[inline]
    fn delete(&mut self, value: &mut T) -> Result<()> {
        self(value);
        Ok(())
    }
}

/// A deleter whose release function can fail
///
/// # Example
///
/// ```rust
/// use cwrap::guard::{Fallible, Guard};
///
/// let guard = Guard::with_value(
///     Fallible::new(|fd: &mut i32| if *fd >= 0 { Ok(()) } else { Err("bad descriptor") }),
///     -1,
/// );
/// assert!(guard.release().is_err());
/// ```
#[derive(Clone)]
pub struct Fallible<F> {
    release: F,
}

impl<F> Fallible<F> {
    /// Wrap a release function that reports failure
    pub fn new(release: F) -> Self {
        Fallible { release }
    }
}

impl<F> fmt::Debug for Fallible<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fallible<{}>", std::any::type_name::<F>())
    }
}

impl<T: ?Sized, F, E> Deleter<T> for Fallible<F>
where
    F: FnMut(&mut T) -> std::result::Result<(), E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn delete(&mut self, value: &mut T) -> Result<()> {
        (self.release)(value).map_err(Error::release)
    }
}

/// Borrows a deleter instead of owning it
///
/// Lets several guards share one stateful deleter in turn, or lets the
/// caller inspect the deleter once the guard is gone. Plain `&F` for an
/// `F: Fn(&mut T)` needs no wrapper: shared references to `Fn` closures
/// are already deleters.
///
/// # Example
///
/// ```rust
/// use cwrap::guard::{ByRef, Deleter, Guard};
///
/// #[derive(Default)]
/// struct Pool {
///     returned: Vec<u32>,
/// }
///
/// impl Deleter<u32> for Pool {
///     fn delete(&mut self, value: &mut u32) -> cwrap::Result<()> {
///         self.returned.push(*value);
///         Ok(())
///     }
/// }
///
/// let mut pool = Pool::default();
/// {
///     let _a = Guard::with_value(ByRef::new(&mut pool), 1u32);
/// }
/// {
///     let _b = Guard::with_value(ByRef::new(&mut pool), 2u32);
/// }
/// assert_eq!(pool.returned, vec![1, 2]);
/// ```
pub struct ByRef<'a, D: ?Sized> {
    deleter: &'a mut D,
}

impl<'a, D: ?Sized> ByRef<'a, D> {
    /// Borrow `deleter` for the lifetime of a guard
    pub fn new(deleter: &'a mut D) -> Self {
        ByRef { deleter }
    }

    /// The borrowed deleter
    pub fn get(&self) -> &D {
        self.deleter
    }
}

impl<D: ?Sized> fmt::Debug for ByRef<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByRef<{}>", std::any::type_name::<D>())
    }
}

impl<T: ?Sized, D> Deleter<T> for ByRef<'_, D>
where
    D: Deleter<T> + ?Sized,
{
    const INFALLIBLE: bool = D::INFALLIBLE;

    #[inline]
    fn delete(&mut self, value: &mut T) -> Result<()> {
        self.deleter.delete(value)
    }
}

/// A release function that may not have been provided
///
/// This is the deleter a [`Guard`](super::Guard) uses when none is named.
/// `DefaultDeleter::default()` is empty: a guard built with it must be
/// given a release function before it is dropped, or the drop panics
/// with "invalid invocation". Leaking the resource silently is never the
/// fallback.
///
/// Any `FnMut(&mut T) + 'static` converts into a `DefaultDeleter<T>`.
pub struct DefaultDeleter<T: ?Sized> {
    release: Option<Box<dyn FnMut(&mut T)>>,
}

impl<T: ?Sized> DefaultDeleter<T> {
    /// A deleter that calls `release`
    pub fn new<F>(release: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        DefaultDeleter {
            release: Some(Box::new(release)),
        }
    }

    /// A deleter with no release function
    pub fn empty() -> Self {
        DefaultDeleter { release: None }
    }

    /// `true` if there is no release function
    pub fn is_empty(&self) -> bool {
        self.release.is_none()
    }
}

impl<T: ?Sized> Default for DefaultDeleter<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized, F> From<F> for DefaultDeleter<T>
where
    F: FnMut(&mut T) + 'static,
{
    fn from(release: F) -> Self {
        DefaultDeleter::new(release)
    }
}

impl<T: ?Sized> fmt::Debug for DefaultDeleter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultDeleter")
            .field("empty", &self.is_empty())
            .finish()
    }
}

impl<T: ?Sized> Deleter<T> for DefaultDeleter<T> {
    fn delete(&mut self, value: &mut T) -> Result<()> {
        match self.release.as_mut() {
            Some(release) => {
                release(value);
                Ok(())
            }
            None => Err(Error::InvalidInvocation),
        }
    }
}
