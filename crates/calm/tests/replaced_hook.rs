//! Interception when the application replaces the panic hook after the first
//! `attempt`. Lives in its own test binary because it changes process state.

use std::panic;

use calm::{attempt, Callable, Level};

#[test]
fn boundary_captures_its_own_trace_when_hook_is_replaced() {
    // Installs the library hook, then replaces it.
    let first = attempt(Callable::unit(|| panic!("first")));
    assert_eq!(first.info().len(), 1);
    panic::set_hook(Box::new(|_| {}));

    let out = attempt(Callable::unit(|| panic!("second")));
    assert_eq!(out.level(), Level::Panic);
    assert_eq!(out.text(), "panic: second");
    assert_eq!(out.info().len(), 1);
    let trace = &out.info()[0];
    assert!(trace.starts_with("thread '"), "got {trace}");
    assert!(
        trace.contains("boundary_captures_its_own_trace_when_hook_is_replaced"),
        "got {trace}"
    );

    let _ = panic::take_hook();
}
