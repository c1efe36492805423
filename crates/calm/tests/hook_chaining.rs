//! Chaining to a panic hook installed before the first `attempt`. Lives in its
//! own test binary because it changes process state.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};

use calm::{attempt, Callable, Level};

static PREVIOUS_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn previous_hook_calls() -> usize {
    PREVIOUS_HOOK_CALLS.load(Ordering::SeqCst)
}

#[test]
fn previous_hook_only_sees_panics_outside_boundaries() {
    panic::set_hook(Box::new(|_| {
        PREVIOUS_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let inside = attempt(Callable::unit(|| panic!("inside")));
    assert_eq!(inside.level(), Level::Panic);
    assert_eq!(inside.text(), "panic: inside");
    assert_eq!(inside.info().len(), 1);
    assert_eq!(previous_hook_calls(), 0);

    let outside = panic::catch_unwind(|| {
        panic!("outside");
    });
    assert!(outside.is_err());
    assert_eq!(previous_hook_calls(), 1);

    let nested = attempt(Callable::unit(|| {
        let inner = attempt(Callable::unit(|| panic!("inner")));
        assert_eq!(inner.text(), "panic: inner");
    }));
    assert!(nested.is_ok());
    assert_eq!(previous_hook_calls(), 1);

    let _ = panic::take_hook();
}
