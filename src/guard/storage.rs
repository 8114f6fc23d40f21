//! Where a guard keeps its value
//!
//! - [`ByValue`] embeds the value in the guard.
//! - [`LateBound`] keeps it behind a `Box` that is only allocated once the
//!   value is bound or first used.
//!
//! Ownership, access and release are the same for both: a guard releasing
//! an unbound `LateBound` default-constructs the value first, exactly as a
//! by-value guard built without a value would have.

use std::cell::OnceCell;
use std::fmt;

/// Storage discipline for a guarded value
pub trait Storage<T> {
    /// Storage already holding `value`
    fn from_value(value: T) -> Self;

    /// The stored value
    fn get(&self) -> &T;

    /// The stored value, mutably
    fn get_mut(&mut self) -> &mut T;

    /// `true` if a value is bound
    fn is_bound(&self) -> bool;

    /// Give up the stored value
    fn into_value(self) -> Option<T>;
}

/// The value lives inline in the guard
#[derive(Debug, Default)]
pub struct ByValue<T>(T);

impl<T> Storage<T> for ByValue<T> {
    #[inline]
    fn from_value(value: T) -> Self {
        ByValue(value)
    }

    #[inline]
    fn get(&self) -> &T {
        &self.0
    }

    #[inline]
    fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    #[inline]
    fn is_bound(&self) -> bool {
        true
    }

    fn into_value(self) -> Option<T> {
        Some(self.0)
    }
}

/// The value lives on the heap and is bound late
///
/// `LateBound::default()` allocates nothing and never constructs a `T`.
/// Reading an unbound slot default-constructs the value at that point, and
/// so does releasing it.
pub struct LateBound<T> {
    slot: OnceCell<Box<T>>,
}

impl<T> LateBound<T> {
    /// An unbound slot
    pub fn unbound() -> Self {
        LateBound {
            slot: OnceCell::new(),
        }
    }

    /// Store `value`, dropping any value already bound
    pub fn bind(&mut self, value: T) {
        self.slot = OnceCell::from(Box::new(value));
    }
}

impl<T> Default for LateBound<T> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<T: fmt::Debug> fmt::Debug for LateBound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => f.debug_tuple("LateBound").field(value).finish(),
            None => f.write_str("LateBound(<unbound>)"),
        }
    }
}

impl<T: Default> Storage<T> for LateBound<T> {
    fn from_value(value: T) -> Self {
        LateBound {
            slot: OnceCell::from(Box::new(value)),
        }
    }

    fn get(&self) -> &T {
        &**self.slot.get_or_init(|| Box::new(T::default()))
    }

    fn get_mut(&mut self) -> &mut T {
        if self.slot.get().is_none() {
            self.bind(T::default());
        }
        match self.slot.get_mut() {
            Some(value) => &mut **value,
            None => unreachable!("slot is bound above"),
        }
    }

    fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }

    fn into_value(self) -> Option<T> {
        self.slot.into_inner().map(|value| *value)
    }
}
