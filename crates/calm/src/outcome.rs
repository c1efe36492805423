//! The [`Outcome`] of one attempted invocation.
//!
//! An outcome carries two independent things:
//!
//! - what the callable returned (`value` / `error`), exactly as returned;
//! - a *condition*: [`Level`], numeric code, text and diagnostic info lines.
//!
//! A callable returning an error does **not** put the outcome at
//! [`Level::Error`]; the level only reflects what happened around the call
//! (rejected shape, intercepted panic) or what the caller decided afterwards.
//!
//! All mutators return `&mut Self` so they can be chained:
//!
//! ```
//! use calm::{attempt, Callable, Level};
//!
//! let mut outcome = attempt(Callable::unit(|| panic!("boom")));
//! outcome.catch(|o| assert!(o.text().contains("boom"))).keep_calm();
//! assert_eq!(outcome.level(), Level::Error);
//! ```

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::callable::{BoxError, Payload};
use crate::config;
use crate::severity::{FaultCode, Level};
use crate::sink::Logger;
use crate::stack::{self, STACK_SENTINEL};

/// Result state of one invocation, or a condition signalled by hand.
#[derive(Default)]
pub struct Outcome {
    value: Option<Payload>,
    error: Option<BoxError>,
    level: Level,
    code: u32,
    text: String,
    info: Vec<String>,
}

impl Outcome {
    /// Creates an empty outcome at [`Level::Ok`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outcome carrying a condition, for manual signalling.
    pub fn condition(level: Level, code: impl Into<u32>, text: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Outcome of a callable that returned normally.
    pub(crate) fn completed(value: Option<Payload>, error: Option<BoxError>) -> Self {
        Self {
            value,
            error,
            ..Self::default()
        }
    }

    /// Outcome of a callable that panicked.
    pub(crate) fn intercepted(message: &str, trace: String) -> Self {
        Self {
            info: vec![trace],
            ..Self::condition(
                Level::Panic,
                FaultCode::InterceptedPanic,
                format!("panic: {message}"),
            )
        }
    }

    /// Outcome of a callable whose shape is not accepted.
    pub(crate) fn rejected(shape: &str) -> Self {
        Self::condition(
            Level::Error,
            FaultCode::UnsupportedShape,
            format!("attempt: unsupported callable shape {shape}"),
        )
    }

    // -----------------------------------------------------------------------
    // Condition accessors and setters
    // -----------------------------------------------------------------------

    /// Returns the current level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Sets the level if `level` is a member of [`Level`]; otherwise the
    /// current level is kept.
    ///
    /// Accepts a [`Level`] or a raw `i8` or `i32`.
    pub fn set_level<L: TryInto<Level>>(&mut self, level: L) -> &mut Self {
        if let Ok(level) = level.try_into() {
            self.level = level;
        }
        self
    }

    /// Returns the current code (`0` when unset).
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Sets the code. Accepts a [`FaultCode`] or any `u32`.
    pub fn set_code(&mut self, code: impl Into<u32>) -> &mut Self {
        self.code = code.into();
        self
    }

    /// Returns the condition text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the condition text.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    /// Returns the diagnostic info lines, oldest first.
    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Appends diagnostic info lines.
    ///
    /// A line equal to [`STACK_SENTINEL`] (`"debug.stack"`) is replaced by a
    /// snapshot of the stack whose first frame is the caller of `add_info`.
    /// Only the first sentinel of one call is expanded.
    #[inline(never)]
    pub fn add_info<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_info_at(config::settings().skip_frames, lines)
    }

    /// [`Self::add_info`] with an explicit number of frames hidden above the
    /// capture.
    #[inline(never)]
    fn add_info_at<I, S>(&mut self, skip: usize, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expanded = false;
        for line in lines {
            let line = line.into();
            if !expanded && line == STACK_SENTINEL {
                expanded = true;
                self.info.push(stack::capture(skip));
            } else {
                self.info.push(line);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Returned data
    // -----------------------------------------------------------------------

    /// Returns the payload the callable returned, if any.
    pub fn value(&self) -> Option<&(dyn Any + Send)> {
        self.value.as_deref()
    }

    /// Returns the payload downcast to `T`, if present and of that type.
    pub fn value_as<T: Any>(&self) -> Option<&T> {
        self.value()?.downcast_ref::<T>()
    }

    /// Returns the error the callable returned, if any.
    pub fn err(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    /// Returns both the payload and the error.
    pub fn result(
        &self,
    ) -> (
        Option<&(dyn Any + Send)>,
        Option<&(dyn std::error::Error + Send + Sync + 'static)>,
    ) {
        (self.value(), self.err())
    }

    /// Consumes the outcome, returning ownership of the payload and error.
    pub fn into_result(self) -> (Option<Payload>, Option<BoxError>) {
        (self.value, self.error)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Returns `true` at [`Level::Ok`].
    pub fn is_ok(&self) -> bool {
        self.level == Level::Ok
    }

    /// Returns `true` at [`Level::Panic`].
    pub fn is_panic(&self) -> bool {
        self.level == Level::Panic
    }

    /// Calls `handler` with this outcome if, and only if, it is at
    /// [`Level::Panic`].
    pub fn catch(&mut self, handler: impl FnOnce(&mut Outcome)) -> &mut Self {
        if self.is_panic() {
            handler(self);
        }
        self
    }

    /// Downgrades [`Level::Panic`] to [`Level::Error`], so logging the outcome
    /// records it instead of panicking again.
    pub fn keep_calm(&mut self) -> &mut Self {
        if self.is_panic() {
            self.level = Level::Error;
        }
        self
    }

    /// Upgrades [`Level::Panic`] to [`Level::Fatal`], so logging the outcome
    /// terminates the process.
    pub fn escalate(&mut self) -> &mut Self {
        if self.is_panic() {
            self.level = Level::Fatal;
        }
        self
    }

    /// Sends the outcome to the matching [`Logger`] operation.
    ///
    /// | Level | Operation |
    /// |-------|-----------|
    /// | `Fatal` | [`Logger::fatal`] |
    /// | `Panic` | [`Logger::panic`] |
    /// | `Error` | [`Logger::print`] |
    /// | `Ok` | nothing; log the returned value or error directly instead |
    pub fn log<L: Logger + ?Sized>(&mut self, sink: &mut L) -> &mut Self {
        match self.level {
            Level::Fatal => sink.fatal(&[&*self]),
            Level::Panic => sink.panic(&[&*self]),
            Level::Error => sink.print(&[&*self]),
            Level::Ok => {}
        }
        self
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Renders the condition; identical to the [`Display`](std::fmt::Display)
    /// output.
    ///
    /// Empty at [`Level::Ok`], otherwise the text followed by
    /// `" (code: 0x%04x)"` when the code is non-zero.
    pub fn error_text(&self) -> String {
        self.to_string()
    }

    /// Serialisable snapshot of the condition.
    pub fn report(&self) -> Report {
        Report {
            level: self.level,
            code: self.code,
            text: self.text.clone(),
            info: self.info.clone(),
            has_value: self.value.is_some(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_ok() {
            return Ok(());
        }
        f.write_str(&self.text)?;
        if self.code != 0 {
            write!(f, " (code: 0x{:04x})", self.code)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outcome")
            .field("value", &self.value.as_ref().map(|_| "<payload>"))
            .field("error", &self.error)
            .field("level", &self.level)
            .field("code", &self.code)
            .field("text", &self.text)
            .field("info", &self.info)
            .finish()
    }
}

impl std::error::Error for Outcome {}

/// Serialisable view of an [`Outcome`], for structured logs and tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Level of the outcome.
    pub level: Level,
    /// Code of the outcome (`0` when unset).
    pub code: u32,
    /// Condition text.
    pub text: String,
    /// Diagnostic info lines.
    pub info: Vec<String>,
    /// Whether the callable returned a payload.
    pub has_value: bool,
    /// The callable's returned error, rendered.
    pub error: Option<String>,
}
