//! `echo_intercepted` hands panics inside a boundary to the previous hook as
//! well. Lives in its own test binary because settings are process-wide.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};

use calm::{attempt, configure, Callable, CaptureSettings, Level};

static PREVIOUS_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn previous_hook_calls() -> usize {
    PREVIOUS_HOOK_CALLS.load(Ordering::SeqCst)
}

#[test]
fn intercepted_panics_are_echoed_to_previous_hook() {
    configure(CaptureSettings {
        echo_intercepted: true,
        ..CaptureSettings::default()
    })
    .unwrap();
    panic::set_hook(Box::new(|_| {
        PREVIOUS_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let out = attempt(Callable::unit(|| panic!("echoed")));
    assert_eq!(out.level(), Level::Panic);
    assert_eq!(out.text(), "panic: echoed");
    assert_eq!(out.info().len(), 1);
    assert_eq!(previous_hook_calls(), 1);

    let outside = panic::catch_unwind(|| {
        panic!("outside");
    });
    assert!(outside.is_err());
    assert_eq!(previous_hook_calls(), 2);

    let _ = panic::take_hook();
}
