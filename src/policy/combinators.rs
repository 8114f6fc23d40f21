//! Combinators for composing return-check policies
//!
//! - [`And<A, B>`]: both policies must accept the value
//! - [`Or<A, B>`]: at least one policy must accept the value
//! - [`Not<A>`]: the policy must reject the value
//!
//! Pre-call hooks are kept: a combinator runs the hooks of every policy it
//! wraps, left to right.
//!
//! # Example
//!
//! ```rust
//! use cwrap::policy::{And, IsErrnoZero, IsNotNegative, Not, IsZero, ReturnCheckPolicy};
//!
//! // `strtol`-style: a non-negative result AND errno left untouched
//! type ParsedCount = And<IsNotNegative, IsErrnoZero>;
//! <ParsedCount as ReturnCheckPolicy<i64>>::pre_call();
//! assert!(ParsedCount::return_value_is_ok(&12i64));
//!
//! // "anything but zero", for unsigned handles
//! assert!(<Not<IsZero> as ReturnCheckPolicy<u32>>::return_value_is_ok(&7));
//! ```

use std::fmt;
use std::marker::PhantomData;

use super::ReturnCheckPolicy;

/// Both policies must accept the value
#[derive(Clone, Copy, Default)]
pub struct And<A, B>(PhantomData<(A, B)>);

impl<A, B> fmt::Debug for And<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "And<{}, {}>",
            std::any::type_name::<A>(),
            std::any::type_name::<B>()
        )
    }
}

impl<Rv, A, B> ReturnCheckPolicy<Rv> for And<A, B>
where
    A: ReturnCheckPolicy<Rv>,
    B: ReturnCheckPolicy<Rv>,
{
    fn pre_call() {
        A::pre_call();
        B::pre_call();
    }

    fn return_value_is_ok(rv: &Rv) -> bool {
        A::return_value_is_ok(rv) && B::return_value_is_ok(rv)
    }

    fn description() -> &'static str {
        "both policies must accept the return value"
    }
}

/// At least one policy must accept the value
#[derive(Clone, Copy, Default)]
pub struct Or<A, B>(PhantomData<(A, B)>);

impl<A, B> fmt::Debug for Or<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Or<{}, {}>",
            std::any::type_name::<A>(),
            std::any::type_name::<B>()
        )
    }
}

impl<Rv, A, B> ReturnCheckPolicy<Rv> for Or<A, B>
where
    A: ReturnCheckPolicy<Rv>,
    B: ReturnCheckPolicy<Rv>,
{
    fn pre_call() {
        A::pre_call();
        B::pre_call();
    }

    fn return_value_is_ok(rv: &Rv) -> bool {
        A::return_value_is_ok(rv) || B::return_value_is_ok(rv)
    }

    fn description() -> &'static str {
        "at least one policy must accept the return value"
    }
}

/// The wrapped policy must reject the value
#[derive(Clone, Copy, Default)]
pub struct Not<A>(PhantomData<A>);

impl<A> fmt::Debug for Not<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not<{}>", std::any::type_name::<A>())
    }
}

impl<Rv, A: ReturnCheckPolicy<Rv>> ReturnCheckPolicy<Rv> for Not<A> {
    fn pre_call() {
        A::pre_call();
    }

    fn return_value_is_ok(rv: &Rv) -> bool {
        !A::return_value_is_ok(rv)
    }

    fn description() -> &'static str {
        "policy must reject the return value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{IsNotNegative, IsNotZero, IsZero};
    use std::cell::RefCell;

    thread_local! {
        static HOOKS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    struct Hooked<const NAME: char>;

    impl<const NAME: char> ReturnCheckPolicy<i32> for Hooked<NAME> {
        fn pre_call() {
            let name = if NAME == 'a' { "a" } else { "b" };
            HOOKS.with(|h| h.borrow_mut().push(name));
        }

        fn return_value_is_ok(_rv: &i32) -> bool {
            true
        }
    }

    #[test]
    fn and_requires_both() {
        type Positive = And<IsNotNegative, IsNotZero>;
        assert!(Positive::return_value_is_ok(&5i32));
        assert!(!Positive::return_value_is_ok(&0i32));
        assert!(!Positive::return_value_is_ok(&-5i32));
    }

    #[test]
    fn or_requires_one() {
        type ZeroOrNegative = Or<IsZero, Not<IsNotNegative>>;
        assert!(ZeroOrNegative::return_value_is_ok(&0i32));
        assert!(ZeroOrNegative::return_value_is_ok(&-1i32));
        assert!(!ZeroOrNegative::return_value_is_ok(&1i32));
    }

    #[test]
    fn not_inverts() {
        assert!(<Not<IsZero> as ReturnCheckPolicy<u8>>::return_value_is_ok(&1));
        assert!(!<Not<IsZero> as ReturnCheckPolicy<u8>>::return_value_is_ok(&0));
    }

    #[test]
    fn hooks_run_left_to_right() {
        HOOKS.with(|h| h.borrow_mut().clear());
        <And<Hooked<'a'>, Not<Hooked<'b'>>> as ReturnCheckPolicy<i32>>::pre_call();
        <Or<Hooked<'b'>, Hooked<'a'>> as ReturnCheckPolicy<i32>>::pre_call();
        let seen = HOOKS.with(|h| h.borrow().clone());
        assert_eq!(seen, vec!["a", "b", "b", "a"]);
    }

    #[test]
    fn debug_names_operands() {
        let and = And::<IsZero, IsNotZero>::default();
        let debug = format!("{:?}", and);
        assert!(debug.starts_with("And<"));
        assert!(debug.contains("IsZero"));
        assert!(format!("{:?}", Not::<IsZero>::default()).starts_with("Not<"));
    }
}
