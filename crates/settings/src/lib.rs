//! Settings file for the food label engine.
//!
//! Every section is optional; missing sections and fields take their
//! defaults. Values are validated after deserialization so a settings
//! value that loads is always usable.
//!
//! ```json
//! {
//!   "layout": { "title_font_size": 18, "centered": true },
//!   "printer": "tcp://192.168.0.40:9100",
//!   "transport": { "connect_timeout_ms": 5000, "retry_attempts": 3 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use food_label_core::{LabelError, LayoutConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for either transport timeout, in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Upper bound for transport retry attempts.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read or written.
    #[error("cannot access settings {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Dotted path of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the value is invalid.
        reason: String,
    },
}

/// Complete settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Label layout parameters.
    pub layout: LayoutConfig,
    /// Printer target: `tcp://host[:port]`, `host:port`, an IP address, or
    /// an OS print queue name. `None` means no printer is configured.
    pub printer: Option<String>,
    /// Transport timeouts and retry policy.
    pub transport: TransportSettings,
}

/// Transport timeouts and retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// TCP connect timeout.
    pub connect_timeout_ms: u64,
    /// Socket write timeout.
    pub write_timeout_ms: u64,
    /// Total attempts per print, including the first.
    pub retry_attempts: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            write_timeout_ms: 30_000,
            retry_attempts: 3,
        }
    }
}

impl TransportSettings {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Write timeout as a [`Duration`].
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Settings {
    /// Read and validate the settings file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        load_settings_from_str(&text)
    }

    /// Like [`Settings::open`], but a missing file yields the defaults.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate and write the settings to `path` as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        self.validate()?;
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Printer target with surrounding whitespace removed, if one is set.
    pub fn printer_target(&self) -> Option<&str> {
        self.printer
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Check every section against its valid range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.layout.validate().map_err(|e| match e {
            LabelError::InvalidLayout { field, reason } => SettingsError::InvalidField {
                field: format!("layout.{field}"),
                reason,
            },
            other => SettingsError::InvalidField {
                field: "layout".into(),
                reason: other.to_string(),
            },
        })?;

        let transport = &self.transport;
        for (field, value) in [
            ("transport.connect_timeout_ms", transport.connect_timeout_ms),
            ("transport.write_timeout_ms", transport.write_timeout_ms),
        ] {
            if value == 0 {
                return Err(SettingsError::InvalidField {
                    field: field.into(),
                    reason: "must be > 0".into(),
                });
            }
            if value > MAX_TIMEOUT_MS {
                return Err(SettingsError::InvalidField {
                    field: field.into(),
                    reason: format!("{value} exceeds maximum ({MAX_TIMEOUT_MS})"),
                });
            }
        }
        if !(1..=MAX_RETRY_ATTEMPTS).contains(&transport.retry_attempts) {
            return Err(SettingsError::InvalidField {
                field: "transport.retry_attempts".into(),
                reason: format!(
                    "{} is outside 1..={MAX_RETRY_ATTEMPTS}",
                    transport.retry_attempts
                ),
            });
        }
        Ok(())
    }
}

/// Load and validate settings from a JSON string.
pub fn load_settings_from_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = serde_json::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}
