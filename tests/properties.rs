//! Property-based tests for guards and checked calls

use proptest::prelude::*;

use cwrap::check::{call_checked, CallCheckContext};
use cwrap::guard::Guard;
use cwrap::policy::{
    ErrorCodeError, IsNotNegative, IsNotZero, IsZero, Not, Or, ReportReturnValue,
    ReturnCheckPolicy,
};
use cwrap::testing::ReleaseCounter;

fn identity(rv: i32) -> i32 {
    rv
}

proptest! {
    #[test]
    fn prop_is_zero_accepts_only_zero(rv in any::<i32>()) {
        prop_assert_eq!(IsZero::return_value_is_ok(&rv), rv == 0);
    }

    #[test]
    fn prop_not_negates(rv in any::<i64>()) {
        prop_assert_eq!(
            <Not<IsNotNegative> as ReturnCheckPolicy<i64>>::return_value_is_ok(&rv),
            rv < 0
        );
    }

    #[test]
    fn prop_or_of_complements_accepts_everything(rv in any::<i16>()) {
        prop_assert!(<Or<IsZero, IsNotZero> as ReturnCheckPolicy<i16>>::return_value_is_ok(&rv));
    }

    #[test]
    fn prop_checked_call_passes_value_or_reports_it(rv in any::<i32>()) {
        match call_checked::<IsZero, ReportReturnValue, _, _>(identity, (rv,)) {
            Ok(value) => prop_assert_eq!(value, 0),
            Err(err) => {
                prop_assert_ne!(rv, 0);
                prop_assert!(err.to_string().contains(&rv.to_string()));
            }
        }
    }

    #[test]
    fn prop_negated_codes_become_os_errors(code in 1..=i32::MAX) {
        type Kernel = CallCheckContext<IsNotNegative, ErrorCodeError>;
        let err = Kernel::call_checked(identity, (-code,)).unwrap_err();
        prop_assert_eq!(err.raw_os_error(), Some(code));
    }

    #[test]
    fn prop_every_guard_releases_once(count in 0usize..64) {
        let counter = ReleaseCounter::new();
        {
            let guards: Vec<_> = (0..count)
                .map(|i| Guard::with_value(counter.deleter(), i))
                .collect();
            prop_assert_eq!(counter.count(), 0);
            prop_assert_eq!(guards.len(), count);
        }
        prop_assert_eq!(counter.count(), count);
    }

    #[test]
    fn prop_move_chain_releases_once(hops in 0usize..32, value in any::<u64>()) {
        let counter = ReleaseCounter::new();
        let mut guard = Guard::with_value(counter.deleter(), value);
        for _ in 0..hops {
            let moved = guard;
            guard = moved;
        }
        prop_assert_eq!(*guard, value);
        prop_assert_eq!(counter.count(), 0);
        drop(guard);
        prop_assert_eq!(counter.count(), 1);
    }
}
