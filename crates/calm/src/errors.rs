//! Error types for conditions that are not themselves outcomes.
//!
//! Everything a callable does, panics included, ends up in an
//! [`crate::Outcome`]. The types here cover misuse of the library surface:
//! raw levels outside the closed set and invalid capture settings.

use thiserror::Error;

/// A raw level value that is not a member of [`crate::Level`].
///
/// Produced by `Level::try_from` for `i8` and `i32`.
/// [`crate::Outcome::set_level`] swallows it and keeps the previous level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown level {0}")]
pub struct UnknownLevel(pub i32);

/// Errors raised while installing process-wide [`crate::CaptureSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// [`crate::configure`] was already called, or a capture already ran with
    /// the defaults.
    ///
    /// Settings are fixed for the lifetime of the process once observed.
    #[error("capture settings are already in effect")]
    AlreadyConfigured,

    /// A setting is out of its accepted range.
    #[error("invalid capture setting '{field}': {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
