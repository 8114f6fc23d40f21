//! Return types the built-in policies accept
//!
//! These traits are sealed. They exist so that the numeric policies can be
//! restricted to integer returns (and, where the sign carries the error,
//! to signed integer returns) at compile time.

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// Integer return values
pub trait Integer: sealed::Sealed + Copy + fmt::Debug {
    /// `self == 0`
    fn is_zero(self) -> bool;
}

/// Signed integer return values
pub trait SignedInteger: Integer {
    /// `self < 0`
    fn is_negative(self) -> bool;

    /// `-self` as an OS error code, if it fits in an `i32`
    fn negated_code(self) -> Option<i32>;
}

/// Return values that can be null
pub trait Nullable: sealed::Sealed {
    /// `true` for a null pointer or an absent value
    fn is_null_value(&self) -> bool;
}

macro_rules! impl_integer {
    ($($ty:ty),+) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Integer for $ty {
                #[inline]
                fn is_zero(self) -> bool {
                    self == 0
                }
            }
        )+
    };
}

macro_rules! impl_signed_integer {
    ($($ty:ty),+) => {
        $(
            impl SignedInteger for $ty {
                #[inline]
                fn is_negative(self) -> bool {
                    self < 0
                }

                fn negated_code(self) -> Option<i32> {
                    (self as i128)
                        .checked_neg()
                        .and_then(|code| i32::try_from(code).ok())
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_signed_integer!(i8, i16, i32, i64, i128, isize);

impl<T: ?Sized> sealed::Sealed for *const T {}
impl<T: ?Sized> sealed::Sealed for *mut T {}
impl<T> sealed::Sealed for Option<T> {}

impl<T: ?Sized> Nullable for *const T {
    #[inline]
    fn is_null_value(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for *mut T {
    #[inline]
    fn is_null_value(&self) -> bool {
        self.is_null()
    }
}

impl<T> Nullable for Option<T> {
    #[inline]
    fn is_null_value(&self) -> bool {
        self.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::NonNull;

    #[test]
    fn zero_checks() {
        assert!(0i32.is_zero());
        assert!(0u64.is_zero());
        assert!(!1usize.is_zero());
        assert!(!(-1i8).is_zero());
    }

    #[test]
    fn negated_code() {
        assert_eq!((-2i32).negated_code(), Some(2));
        assert_eq!((-22i64).negated_code(), Some(22));
        assert_eq!(5isize.negated_code(), Some(-5));
        assert_eq!(i64::MIN.negated_code(), None);
        assert_eq!(i128::MIN.negated_code(), None);
    }

    #[test]
    fn pointers_and_options() {
        let value = 7u8;
        assert!(std::ptr::null::<u8>().is_null_value());
        assert!(std::ptr::null_mut::<u8>().is_null_value());
        assert!(!(&value as *const u8).is_null_value());
        assert!(None::<NonNull<u8>>.is_null_value());
        assert!(!Some(NonNull::from(&value)).is_null_value());
    }
}
