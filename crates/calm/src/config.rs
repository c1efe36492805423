//! Process-wide capture settings.
//!
//! Stack snapshots and the panic hook read [`settings`] on every capture.
//! Applications that want non-default values call [`configure`] once, early,
//! before the first [`crate::attempt()`]; afterwards the values are frozen.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

/// Smallest accepted [`CaptureSettings::buffer_size`]; anything smaller cannot
/// hold a header line and a single frame.
pub const MIN_BUFFER_SIZE: usize = 256;

static SETTINGS: OnceLock<CaptureSettings> = OnceLock::new();

/// Tunables for stack capture and panic interception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Upper bound, in bytes, of one rendered stack snapshot.
    pub buffer_size: usize,

    /// Frames hidden above the point of interest, in addition to the capture
    /// machinery itself.
    pub skip_frames: usize,

    /// When `true`, panics inside an `attempt` boundary are also passed to the
    /// previously installed panic hook (usually printing
    /// `thread '…' panicked at …` to stderr).
    pub echo_intercepted: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            buffer_size: 4096,
            skip_frames: 2,
            echo_intercepted: false,
        }
    }
}

impl CaptureSettings {
    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(SettingsError::Invalid {
                field: "buffer_size",
                reason: format!(
                    "{} is below the minimum of {MIN_BUFFER_SIZE} bytes",
                    self.buffer_size
                ),
            });
        }
        Ok(())
    }
}

/// Installs process-wide capture settings.
///
/// Fails with [`SettingsError::AlreadyConfigured`] if settings were installed
/// before or if a capture already ran (which freezes the defaults).
pub fn configure(new: CaptureSettings) -> Result<(), SettingsError> {
    new.validate()?;
    SETTINGS
        .set(new)
        .map_err(|_| SettingsError::AlreadyConfigured)?;
    tracing::debug!(settings = ?settings(), "capture settings configured");
    Ok(())
}

/// Returns the settings in effect, freezing the defaults on first use.
pub fn settings() -> &'static CaptureSettings {
    SETTINGS.get_or_init(CaptureSettings::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let defaults = CaptureSettings::default();
        assert_eq!(defaults.buffer_size, 4096);
        assert_eq!(defaults.skip_frames, 2);
        assert!(!defaults.echo_intercepted);
        assert_eq!(defaults.validate(), Ok(()));
    }

    #[test]
    fn tiny_buffer_is_rejected() {
        let settings = CaptureSettings {
            buffer_size: 16,
            ..CaptureSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "buffer_size",
                ..
            }
        ));
    }

    #[test]
    fn invalid_settings_are_rejected_before_installation() {
        let settings = CaptureSettings {
            buffer_size: 0,
            ..CaptureSettings::default()
        };
        assert!(matches!(
            configure(settings),
            Err(SettingsError::Invalid { .. })
        ));
    }

    #[test]
    fn second_configuration_is_rejected() {
        // Whatever happened first in this process, the settings are frozen now.
        let _ = settings();
        assert_eq!(
            configure(CaptureSettings::default()),
            Err(SettingsError::AlreadyConfigured)
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: CaptureSettings =
            serde_json::from_str(r#"{ "buffer_size": 8192 }"#).unwrap();
        assert_eq!(settings.buffer_size, 8192);
        assert_eq!(settings.skip_frames, 2);
        assert!(!settings.echo_intercepted);
    }
}
