//! Panic interception and severity classification.
//!
//! Wrap a unit of work in [`attempt`] and get back an [`Outcome`] instead of a
//! torn-down thread. The outcome records what the work returned and classifies
//! what happened around it on a small lattice of [`Level`]s, so calling code
//! can inspect, downgrade, escalate or log the condition uniformly.
//!
//! ```
//! use calm::{attempt, Callable, Level};
//!
//! let divisor = std::hint::black_box(0);
//! let mut outcome = attempt(Callable::value(move || 17 / divisor));
//! assert_eq!(outcome.level(), Level::Panic);
//! assert!(outcome.text().starts_with("panic: "));
//!
//! outcome.escalate();
//! assert_eq!(outcome.level(), Level::Fatal);
//! ```
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`severity`] | [`Level`], [`level_name`], reserved [`FaultCode`]s |
//! | [`callable`] | The four accepted [`Callable`] shapes |
//! | [`attempt`](mod@attempt) | [`attempt`], [`attempt_dyn`] and the panic hook |
//! | [`outcome`] | [`Outcome`] and its serialisable [`Report`] |
//! | [`stack`] | Trimmed stack snapshots |
//! | [`sink`] | The [`Logger`] capability and [`TracingLogger`] |
//! | [`config`] | Process-wide [`CaptureSettings`] |
//! | [`errors`] | Errors that are not outcomes |
//!
//! ## Unwinding
//!
//! Interception relies on unwinding. Built with `panic = "abort"`, a panic
//! aborts the process before any boundary sees it.

pub mod attempt;
pub mod callable;
pub mod config;
pub mod errors;
pub mod outcome;
pub mod severity;
pub mod sink;
pub mod stack;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use attempt::{attempt, attempt_dyn};
pub use callable::{BoxError, Callable, FallibleFn, Payload, UnitFn, ValueAndErrorFn, ValueFn};
pub use config::{configure, settings, CaptureSettings};
pub use errors::{SettingsError, UnknownLevel};
pub use outcome::{Outcome, Report};
pub use severity::{level_name, FaultCode, Level};
pub use sink::{Logger, TracingLogger};
pub use stack::STACK_SENTINEL;
