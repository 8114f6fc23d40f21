//! Integration tests for resource guards against a mock C-style API.
//!
//! The mock hands out integer handles and records every release, so the
//! tests can check that each handle is released exactly once and by the
//! guard that owns it last.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use cwrap::guard::{ByRef, DefaultDeleter, Deleter, Fallible, Guard, LateBound};
use cwrap::testing::ReleaseCounter;
use cwrap::Error;

// ============================================================================
// Mock API
// ============================================================================

thread_local! {
    static NEXT_HANDLE: Cell<i32> = const { Cell::new(100) };
    static RELEASED: RefCell<Vec<i32>> = const { RefCell::new(Vec::new()) };
}

fn mock_create() -> i32 {
    NEXT_HANDLE.with(|next| {
        let handle = next.get();
        next.set(handle + 1);
        handle
    })
}

fn mock_release(handle: &mut i32) {
    RELEASED.with(|released| released.borrow_mut().push(*handle));
}

fn released() -> Vec<i32> {
    RELEASED.with(|released| released.borrow().clone())
}

fn reset_mock() {
    RELEASED.with(|released| released.borrow_mut().clear());
}

type Handle = Guard<i32, fn(&mut i32)>;

fn open_handle() -> Handle {
    Guard::with_value(mock_release as fn(&mut i32), mock_create())
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn drop_releases_exactly_once() {
    reset_mock();
    let value;
    {
        let handle = open_handle();
        value = *handle;
        assert!(released().is_empty());
    }
    assert_eq!(released(), vec![value]);
}

#[test]
fn move_chain_releases_once_at_the_end() {
    reset_mock();
    let first = open_handle();
    let value = *first;
    let second = first;
    let third = second;
    assert!(released().is_empty());
    drop(third);
    assert_eq!(released(), vec![value]);
}

#[test]
fn guard_moved_through_functions() {
    fn pass_through(handle: Handle) -> Handle {
        handle
    }

    reset_mock();
    let handle = pass_through(pass_through(open_handle()));
    let value = *handle;
    assert!(released().is_empty());
    drop(handle);
    assert_eq!(released(), vec![value]);
}

#[test]
fn guards_in_a_collection() {
    reset_mock();
    let handles: Vec<Handle> = (0..3).map(|_| open_handle()).collect();
    let values: Vec<i32> = handles.iter().map(|h| **h).collect();
    drop(handles);
    assert_eq!(released(), values);
}

#[test]
fn assigning_over_a_guard_releases_the_old_value() {
    reset_mock();
    let mut handle = open_handle();
    let old = *handle;
    let replacement = open_handle();
    let new = *replacement;

    handle = replacement;
    assert_eq!(released(), vec![old]);

    drop(handle);
    assert_eq!(released(), vec![old, new]);
}

#[test]
fn reading_never_releases() {
    reset_mock();
    let mut handle = open_handle();
    for _ in 0..5 {
        let _ = *handle.get();
        let _ = handle.get_mut();
    }
    assert!(released().is_empty());
    drop(handle);
    assert_eq!(released().len(), 1);
}

#[test]
fn value_is_moved_not_cloned() {
    // No Clone impl: a guard that tried to copy it would not compile
    struct Connection {
        id: u32,
    }

    let counter = ReleaseCounter::new();
    let guard = Guard::with_value(counter.deleter(), Connection { id: 7 });
    assert_eq!(guard.id, 7);
    drop(guard);
    assert_eq!(counter.count(), 1);
}

// ============================================================================
// Deleters
// ============================================================================

#[test]
fn stateful_deleter_type() {
    struct Pool {
        returned: Rc<RefCell<Vec<i32>>>,
    }

    impl Deleter<i32> for Pool {
        const INFALLIBLE: bool = true;

        fn delete(&mut self, value: &mut i32) -> cwrap::Result<()> {
            self.returned.borrow_mut().push(*value);
            Ok(())
        }
    }

    let returned = Rc::new(RefCell::new(Vec::new()));
    {
        let _a = Guard::with_value(Pool { returned: returned.clone() }, 1);
        let _b = Guard::with_value(Pool { returned: returned.clone() }, 2);
    }
    // Locals drop in reverse order
    assert_eq!(*returned.borrow(), vec![2, 1]);
    assert!(<Guard<i32, Pool>>::INFALLIBLE_DROP);
}

#[test]
fn deleter_held_by_reference() {
    #[derive(Default)]
    struct Recycler {
        recycled: Vec<i32>,
    }

    impl Deleter<i32> for Recycler {
        fn delete(&mut self, value: &mut i32) -> cwrap::Result<()> {
            self.recycled.push(*value);
            Ok(())
        }
    }

    let mut recycler = Recycler::default();
    {
        let guard = Guard::with_value(ByRef::new(&mut recycler), 5i32);
        assert!(guard.deleter().get().recycled.is_empty());
    }
    {
        let _guard = Guard::with_value(ByRef::new(&mut recycler), 6i32);
    }
    // The deleter outlives both guards and kept its state
    assert_eq!(recycler.recycled, vec![5, 6]);
}

#[test]
fn fn_closure_held_by_shared_reference() {
    reset_mock();
    let release = |handle: &mut i32| mock_release(handle);
    let first = Guard::with_value(&release, mock_create());
    let second = Guard::with_value(&release, mock_create());
    let values = vec![*first, *second];
    drop(first);
    drop(second);
    assert_eq!(released(), values);
}

#[test]
fn default_deleter_converted_from_closure() {
    let counter = ReleaseCounter::new();
    let deleter: DefaultDeleter<String> = counter.deleter().into();
    {
        let guard = Guard::with_value(deleter, String::from("session"));
        assert_eq!(guard.len(), 7);
    }
    assert_eq!(counter.count(), 1);
}

#[test]
#[should_panic(expected = "invalid invocation")]
fn default_guard_panics_on_drop() {
    let _guard: Guard<i32> = Guard::new();
}

#[test]
fn default_guard_release_reports_invalid_invocation() {
    let guard: Guard<i32> = Guard::from_value(1);
    let err = guard.release().unwrap_err();
    assert!(matches!(err, Error::InvalidInvocation));
}

#[test]
fn fallible_release_surfaces_the_error() {
    let guard = Guard::with_value(
        Fallible::new(|fd: &mut i32| {
            if *fd >= 0 {
                Ok(())
            } else {
                Err(std::io::Error::from_raw_os_error(libc::EBADF))
            }
        }),
        -1,
    );
    let err = guard.release().unwrap_err();
    assert!(err.to_string().contains("release failed"));
}

#[test]
fn failing_cleanup_while_unwinding_does_not_abort() {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard: Guard<i32> = Guard::from_value(1);
        panic!("original failure");
    }));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"original failure"));
}

// ============================================================================
// Late binding
// ============================================================================

#[test]
fn late_bound_guard_never_bound_releases_a_default_handle() {
    reset_mock();
    {
        let handle: Guard<i32, fn(&mut i32), LateBound<i32>> =
            Guard::late(mock_release as fn(&mut i32));
        assert!(!handle.is_bound());
    }
    assert_eq!(released(), vec![0]);
}

#[test]
fn late_bound_guard_with_empty_default_deleter_fails_loudly() {
    let result = panic::catch_unwind(|| {
        let _handle: Guard<i32, DefaultDeleter<i32>, LateBound<i32>> = Guard::default();
    });
    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert!(message.contains("invalid invocation"));

    let handle: Guard<i32, DefaultDeleter<i32>, LateBound<i32>> = Guard::default();
    assert!(matches!(handle.release(), Err(Error::InvalidInvocation)));
}

#[test]
fn late_bound_guard_bound_with_reset() {
    reset_mock();
    let mut handle: Guard<i32, fn(&mut i32), LateBound<i32>> =
        Guard::late(mock_release as fn(&mut i32));
    let value = mock_create();
    handle.reset(value).unwrap();
    assert!(handle.is_bound());
    // The unbound slot was released as a default handle
    assert_eq!(released(), vec![0]);
    drop(handle);
    assert_eq!(released(), vec![0, value]);
}

#[test]
fn into_inner_hands_ownership_back() {
    reset_mock();
    let handle = open_handle();
    let value = *handle;
    let raw = handle.into_inner();
    assert_eq!(raw, Some(value));
    assert!(released().is_empty());
}

// ============================================================================
// Out-parameter initialisation
// ============================================================================

#[derive(Debug, Default)]
struct Resource {
    initialised: bool,
    buffer: Vec<u8>,
}

/// C-style init that fills in a caller-provided struct
fn do_init_work(resource: &mut Resource) {
    resource.initialised = true;
    resource.buffer.resize(16, 0);
}

struct ReleaseResource {
    calls: Rc<Cell<usize>>,
}

impl Deleter<Resource> for ReleaseResource {
    fn delete(&mut self, resource: &mut Resource) -> cwrap::Result<()> {
        assert!(resource.initialised);
        resource.buffer.clear();
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

#[test]
fn default_constructed_value_initialised_in_place() {
    let calls = Rc::new(Cell::new(0));
    {
        let mut guard = Guard::with_deleter(ReleaseResource { calls: calls.clone() });
        do_init_work(guard.get_mut());
        assert_eq!(guard.buffer.len(), 16);
        assert_eq!(calls.get(), 0);
    }
    assert_eq!(calls.get(), 1);
}

#[test]
fn late_bound_value_initialised_on_first_use() {
    let calls = Rc::new(Cell::new(0));
    {
        let mut guard: Guard<Resource, ReleaseResource, LateBound<Resource>> =
            Guard::late(ReleaseResource { calls: calls.clone() });
        assert!(!guard.is_bound());
        do_init_work(guard.get_mut());
        assert!(guard.is_bound());
        assert!(guard.get().initialised);
    }
    assert_eq!(calls.get(), 1);
}

#[test]
fn closure_deleter_over_default_value() {
    let counter = ReleaseCounter::new();
    {
        let mut guard: Guard<Resource, _> = Guard::with_deleter(counter.deleter());
        do_init_work(&mut guard);
        assert!(guard.initialised);
    }
    assert_eq!(counter.count(), 1);
}
