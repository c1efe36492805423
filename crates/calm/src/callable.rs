//! The closed set of callable shapes accepted by [`crate::attempt()`].
//!
//! | Shape | Boxed type | Outcome fields populated |
//! |-------|-----------|--------------------------|
//! | unit | [`UnitFn`] | none |
//! | fallible | [`FallibleFn`] | `error` |
//! | value | [`ValueFn`] | `value` |
//! | value and error | [`ValueAndErrorFn`] | `value` and/or `error` |
//!
//! [`crate::attempt_dyn`] accepts any `'static` value and recognises exactly
//! these four boxed types; everything else is rejected before invocation.

use std::any::{type_name, Any};

/// Arbitrary payload returned by a callable.
pub type Payload = Box<dyn Any + Send>;

/// Error value returned by a callable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// No inputs, no outputs.
pub type UnitFn = Box<dyn FnOnce()>;

/// No inputs, returns an error-like value.
pub type FallibleFn = Box<dyn FnOnce() -> Result<(), BoxError>>;

/// No inputs, returns an arbitrary payload.
pub type ValueFn = Box<dyn FnOnce() -> Payload>;

/// No inputs, returns a payload and an error, each of which may be absent.
///
/// Both halves are kept as returned, so a callable can hand back a partial
/// result together with the error that cut it short.
pub type ValueAndErrorFn = Box<dyn FnOnce() -> (Option<Payload>, Option<BoxError>)>;

/// A unit of work in one of the four accepted shapes.
pub enum Callable {
    /// See [`UnitFn`].
    Unit(UnitFn),
    /// See [`FallibleFn`].
    Fallible(FallibleFn),
    /// See [`ValueFn`].
    Value(ValueFn),
    /// See [`ValueAndErrorFn`].
    ValueAndError(ValueAndErrorFn),
}

impl Callable {
    /// Wraps a closure with no outputs.
    pub fn unit(f: impl FnOnce() + 'static) -> Self {
        Self::Unit(Box::new(f))
    }

    /// Wraps a closure returning only an error-like value.
    pub fn fallible<E>(f: impl FnOnce() -> Result<(), E> + 'static) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Fallible(Box::new(move || f().map_err(Into::into)))
    }

    /// Wraps a closure returning a payload of any `Send + 'static` type.
    pub fn value<T>(f: impl FnOnce() -> T + 'static) -> Self
    where
        T: Any + Send,
    {
        Self::Value(Box::new(move || Box::new(f()) as Payload))
    }

    /// Wraps a closure returning a payload together with an optional error.
    pub fn value_and_error<T, E>(f: impl FnOnce() -> (T, Option<E>) + 'static) -> Self
    where
        T: Any + Send,
        E: Into<BoxError>,
    {
        Self::ValueAndError(Box::new(move || {
            let (value, error) = f();
            (Some(Box::new(value) as Payload), error.map(Into::into))
        }))
    }

    /// Wraps a closure returning a payload or an error.
    pub fn value_or_error<T, E>(f: impl FnOnce() -> Result<T, E> + 'static) -> Self
    where
        T: Any + Send,
        E: Into<BoxError>,
    {
        Self::ValueAndError(Box::new(move || match f() {
            Ok(value) => (Some(Box::new(value) as Payload), None),
            Err(error) => (None, Some(error.into())),
        }))
    }

    /// Short name of the shape, used in log events.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Unit(_) => "unit",
            Self::Fallible(_) => "fallible",
            Self::Value(_) => "value",
            Self::ValueAndError(_) => "value_and_error",
        }
    }

    /// Recognises one of the four boxed shapes inside an arbitrary value.
    ///
    /// On failure, returns the full type name of `f` for diagnostics.
    pub fn from_any<F: Any>(f: F) -> Result<Self, &'static str> {
        let boxed: Box<dyn Any> = Box::new(f);
        let boxed = match boxed.downcast::<UnitFn>() {
            Ok(f) => return Ok(Self::Unit(*f)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<FallibleFn>() {
            Ok(f) => return Ok(Self::Fallible(*f)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<ValueFn>() {
            Ok(f) => return Ok(Self::Value(*f)),
            Err(other) => other,
        };
        match boxed.downcast::<ValueAndErrorFn>() {
            Ok(f) => Ok(Self::ValueAndError(*f)),
            Err(_) => Err(type_name::<F>()),
        }
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Callable").field(&self.shape()).finish()
    }
}
