//! Panic-intercepting invocation.
//!
//! [`attempt`] runs a [`Callable`] inside `catch_unwind` and always returns an
//! [`Outcome`]; a panic never propagates past it.
//!
//! ## Fault-site traces
//!
//! By the time `catch_unwind` returns, the panicking frames are gone. To keep
//! them, the first `attempt` installs a process-wide panic hook that, while
//! the panicking thread is inside an `attempt` boundary, stores a stack
//! snapshot in a thread-local for the boundary to pick up. The snapshot
//! starts at the frame that panicked; std's panic machinery is hidden. Panics
//! outside any boundary are handed to the previously installed hook unchanged.
//!
//! If the application replaces the hook afterwards, the boundary falls back to
//! a snapshot taken at the point of interception.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::callable::{BoxError, Callable, Payload};
use crate::config;
use crate::outcome::Outcome;
use crate::stack;

/// Rendering of a panic payload that is neither a string nor an [`Outcome`].
const OPAQUE_PAYLOAD: &str = "Box<dyn Any>";

static HOOK: Once = Once::new();

thread_local! {
    /// Number of `attempt` boundaries active on this thread.
    static DEPTH: Cell<usize> = const { Cell::new(0) };

    /// Snapshot recorded by the panic hook for the innermost boundary.
    static FAULT_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Runs `callable`, intercepting any panic it raises.
///
/// - Normal return: [`crate::Level::Ok`], with the value and/or error the shape
///   produces.
/// - Panic: [`crate::Level::Panic`], code
///   [`crate::FaultCode::InterceptedPanic`], text `"panic: <payload>"` and
///   exactly one info line holding the stack snapshot. Anything the callable
///   computed before panicking is discarded.
#[inline(never)]
pub fn attempt(callable: Callable) -> Outcome {
    install_hook();
    let shape = callable.shape();

    let boundary = Boundary::enter();
    let result = panic::catch_unwind(AssertUnwindSafe(move || invoke(callable)));
    drop(boundary);

    match result {
        Ok((value, error)) => {
            tracing::trace!(shape, "callable completed");
            Outcome::completed(value, error)
        }
        Err(payload) => intercept(&*payload),
    }
}

/// Runs `f` if it is one of the four boxed shapes of [`crate::callable`],
/// intercepting any panic it raises.
///
/// Any other value is rejected without being invoked: the outcome is at
/// [`crate::Level::Error`] with code [`crate::FaultCode::UnsupportedShape`] and
/// text naming the type of `f`.
pub fn attempt_dyn<F: Any>(f: F) -> Outcome {
    match Callable::from_any(f) {
        Ok(callable) => attempt(callable),
        Err(shape) => {
            tracing::debug!(shape, "rejected unsupported callable shape");
            Outcome::rejected(shape)
        }
    }
}

fn invoke(callable: Callable) -> (Option<Payload>, Option<BoxError>) {
    match callable {
        Callable::Unit(f) => {
            f();
            (None, None)
        }
        Callable::Fallible(f) => (None, f().err()),
        Callable::Value(f) => (Some(f()), None),
        Callable::ValueAndError(f) => f(),
    }
}

#[inline(never)]
fn intercept(payload: &(dyn Any + Send)) -> Outcome {
    let message = payload_text(payload);
    let trace = FAULT_SITE
        .with(|site| site.borrow_mut().take())
        .unwrap_or_else(|| stack::capture(config::settings().skip_frames));
    let outcome = Outcome::intercepted(&message, trace);
    tracing::debug!(code = outcome.code(), text = outcome.text(), "intercepted panic");
    outcome
}

/// Renders a panic payload: string payloads verbatim, an [`Outcome`] through
/// its `Display`, anything else as an opaque marker.
fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(outcome) = payload.downcast_ref::<Outcome>() {
        outcome.to_string()
    } else {
        OPAQUE_PAYLOAD.to_owned()
    }
}

/// Marks the current thread as inside an `attempt` boundary for its lifetime.
struct Boundary;

impl Boundary {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        FAULT_SITE.with(|site| site.borrow_mut().take());
        Self
    }
}

impl Drop for Boundary {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn inside_boundary() -> bool {
    DEPTH.try_with(Cell::get).unwrap_or(0) > 0
}

fn install_hook() {
    // set_hook panics when called during unwinding.
    if std::thread::panicking() {
        return;
    }
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !inside_boundary() {
                previous(info);
                return;
            }
            let trace = stack::fault_site(config::settings().skip_frames);
            let _ = FAULT_SITE.try_with(|site| *site.borrow_mut() = Some(trace));
            if config::settings().echo_intercepted {
                previous(info);
            }
        }));
    });
}
