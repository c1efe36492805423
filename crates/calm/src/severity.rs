//! Severity levels and reserved fault codes.
//!
//! A [`Level`] classifies an [`crate::Outcome`]: [`Level::Ok`] is the identity
//! ("no condition"), the remaining three are ordered by increasing severity.
//! Raw values follow the usual logging numbering so that a level can be mapped
//! onto a logger's own scale without a lookup table.

use serde::{Deserialize, Serialize};

use crate::errors::UnknownLevel;

/// Display name returned by [`level_name`] for raw values outside the closed set.
pub const UNKNOWN_LEVEL_NAME: &str = "?";

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Severity of an [`crate::Outcome`].
///
/// Transitions between levels are not monotonic in general; only
/// [`crate::Outcome::keep_calm`] and [`crate::Outcome::escalate`] follow a
/// fixed direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i8)]
pub enum Level {
    /// No condition.
    #[default]
    Ok = 0,
    /// A recorded, non-terminating condition.
    Error = 4,
    /// An intercepted panic, recoverable through [`crate::Outcome::catch`].
    Panic = 5,
    /// A condition that warrants process termination once logged.
    Fatal = 6,
}

impl Level {
    /// Maps a raw level to a member of the closed set.
    pub fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            0 => Some(Self::Ok),
            4 => Some(Self::Error),
            5 => Some(Self::Panic),
            6 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns the raw numeric value.
    pub fn as_raw(self) -> i8 {
        self as i8
    }

    /// Returns the display name (`"OK"`, `"ERROR"`, `"PANIC"` or `"FATAL"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }
}

impl TryFrom<i8> for Level {
    type Error = UnknownLevel;

    fn try_from(raw: i8) -> Result<Self, UnknownLevel> {
        Self::from_raw(raw).ok_or(UnknownLevel(raw.into()))
    }
}

impl TryFrom<i32> for Level {
    type Error = UnknownLevel;

    fn try_from(raw: i32) -> Result<Self, UnknownLevel> {
        i8::try_from(raw)
            .ok()
            .and_then(Self::from_raw)
            .ok_or(UnknownLevel(raw))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the display name of a raw level.
///
/// Total over `i8`: anything outside the closed set maps to
/// [`UNKNOWN_LEVEL_NAME`].
pub fn level_name(raw: i8) -> &'static str {
    Level::from_raw(raw).map_or(UNKNOWN_LEVEL_NAME, Level::name)
}

// ---------------------------------------------------------------------------
// Fault codes
// ---------------------------------------------------------------------------

/// Codes reserved by this crate. `0` is never used and means "no code".
///
/// Callers are free to assign any other `u32` through
/// [`crate::Outcome::set_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum FaultCode {
    /// The callable handed to [`crate::attempt_dyn`] has none of the accepted shapes.
    UnsupportedShape = 1,
    /// The callable panicked and the panic was intercepted.
    InterceptedPanic = 2,
}

impl FaultCode {
    /// Returns the numeric code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl From<FaultCode> for u32 {
    fn from(code: FaultCode) -> Self {
        code.as_u32()
    }
}

impl std::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04x}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_name_is_total() {
        let expected = [
            (0, "OK"),
            (4, "ERROR"),
            (5, "PANIC"),
            (6, "FATAL"),
            (17, "?"),
            (1, "?"),
            (-1, "?"),
            (i8::MAX, "?"),
            (i8::MIN, "?"),
        ];
        for (raw, name) in expected {
            assert_eq!(level_name(raw), name, "level_name({raw})");
        }
    }

    #[test]
    fn every_raw_value_round_trips_or_is_unknown() {
        for raw in i8::MIN..=i8::MAX {
            match Level::from_raw(raw) {
                Some(level) => {
                    assert_eq!(level.as_raw(), raw);
                    assert_eq!(level_name(raw), level.name());
                }
                None => assert_eq!(level_name(raw), UNKNOWN_LEVEL_NAME),
            }
        }
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Ok < Level::Error);
        assert!(Level::Error < Level::Panic);
        assert!(Level::Panic < Level::Fatal);
    }

    #[test]
    fn try_from_rejects_unknown_raw_level() {
        assert_eq!(Level::try_from(6_i8), Ok(Level::Fatal));
        assert_eq!(Level::try_from(17_i8), Err(UnknownLevel(17)));
    }

    #[test]
    fn try_from_accepts_wide_raw_levels() {
        assert_eq!(Level::try_from(4_i32), Ok(Level::Error));
        assert_eq!(Level::try_from(17_i32), Err(UnknownLevel(17)));
        assert_eq!(Level::try_from(260_i32), Err(UnknownLevel(260)));
        assert_eq!(Level::try_from(-1_i32), Err(UnknownLevel(-1)));
    }

    #[test]
    fn level_serialises_as_its_name() {
        let json = serde_json::to_string(&Level::Panic).unwrap();
        assert_eq!(json, "\"PANIC\"");
    }

    #[test]
    fn fault_codes_are_non_zero_and_render_as_hex() {
        assert_eq!(u32::from(FaultCode::UnsupportedShape), 1);
        assert_eq!(u32::from(FaultCode::InterceptedPanic), 2);
        assert_eq!(FaultCode::InterceptedPanic.to_string(), "0x0002");
    }
}
