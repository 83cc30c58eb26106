//! TOML configuration loader with validation.
//!
//! Loads `ConsoleConfig` from a TOML file (or string, for tests) and
//! validates parameter bounds: threshold ordering, poll interval and
//! export cadence sanity.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Configuration loading/validation error.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    IoError(String),

    /// TOML parse error.
    #[error("config parse error: {0}")]
    ParseError(String),

    /// Parameter validation error.
    #[error("config validation: {0}")]
    ValidationError(String),
}

/// Complete console configuration, ready for runtime use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Serial port path (`/dev/ttyUSB0`, `COM7`).
    #[serde(default = "default_port")]
    pub port: String,

    /// Serial baud rate.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Setpoint shown and commanded at session start [°C].
    #[serde(default = "default_setpoint")]
    pub default_setpoint: f64,

    /// Setpoints at or above this are rejected [°C].
    #[serde(default = "default_max_setpoint")]
    pub max_setpoint: f64,

    /// Setpoints above this require operator confirmation [°C].
    #[serde(default = "default_high_setpoint_threshold")]
    pub high_setpoint_threshold: f64,

    /// Warning interlock threshold [°C].
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    /// Critical interlock threshold [°C].
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,

    /// Operator decision window for the warning interlock [s].
    #[serde(default = "default_warning_timeout_s")]
    pub warning_timeout_s: f64,

    /// Poll loop period [ms].
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Export sink path (flat CSV table).
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Accepted readings between periodic export flushes.
    #[serde(default = "default_export_every")]
    pub export_every: usize,
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_baud_rate() -> u32 {
    consts::DEFAULT_BAUD_RATE
}
fn default_setpoint() -> f64 {
    consts::DEFAULT_SETPOINT
}
fn default_max_setpoint() -> f64 {
    consts::MAX_SETPOINT
}
fn default_high_setpoint_threshold() -> f64 {
    consts::HIGH_SETPOINT_THRESHOLD
}
fn default_warning_threshold() -> f64 {
    consts::TEMP_WARNING_THRESHOLD
}
fn default_critical_threshold() -> f64 {
    consts::TEMP_CRITICAL_THRESHOLD
}
fn default_warning_timeout_s() -> f64 {
    consts::WARNING_TIMEOUT_S
}
fn default_poll_interval_ms() -> u64 {
    consts::POLL_INTERVAL_MS
}
fn default_export_path() -> String {
    consts::DEFAULT_EXPORT_PATH.to_string()
}
fn default_export_every() -> usize {
    consts::EXPORT_EVERY
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            default_setpoint: default_setpoint(),
            max_setpoint: default_max_setpoint(),
            high_setpoint_threshold: default_high_setpoint_threshold(),
            warning_threshold: default_warning_threshold(),
            critical_threshold: default_critical_threshold(),
            warning_timeout_s: default_warning_timeout_s(),
            poll_interval_ms: default_poll_interval_ms(),
            export_path: default_export_path(),
            export_every: default_export_every(),
        }
    }
}

impl ConsoleConfig {
    /// Load and validate the console configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::load_from_str(&text)
    }

    /// Load config from a TOML string (for testing).
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter bounds.
    ///
    /// - setpoint limits ordered: `0 ≤ default < high < max`
    /// - interlock thresholds ordered: `max ≤ warning < critical`
    /// - `warning_timeout_s > 0`, `poll_interval_ms ≥ 10`,
    ///   `export_every ≥ 1`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_setpoint >= 0.0 && self.default_setpoint < self.max_setpoint) {
            return Err(ConfigError::ValidationError(format!(
                "default_setpoint {} out of range [0, {})",
                self.default_setpoint, self.max_setpoint
            )));
        }
        if self.high_setpoint_threshold >= self.max_setpoint {
            return Err(ConfigError::ValidationError(format!(
                "high_setpoint_threshold {} must be below max_setpoint {}",
                self.high_setpoint_threshold, self.max_setpoint
            )));
        }
        if self.warning_threshold >= self.critical_threshold {
            return Err(ConfigError::ValidationError(format!(
                "warning_threshold {} must be below critical_threshold {}",
                self.warning_threshold, self.critical_threshold
            )));
        }
        if self.max_setpoint > self.warning_threshold {
            return Err(ConfigError::ValidationError(format!(
                "max_setpoint {} must not exceed warning_threshold {}",
                self.max_setpoint, self.warning_threshold
            )));
        }
        if self.warning_timeout_s <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "warning_timeout_s {} must be positive",
                self.warning_timeout_s
            )));
        }
        if self.poll_interval_ms < 10 {
            return Err(ConfigError::ValidationError(format!(
                "poll_interval_ms {} below minimum 10",
                self.poll_interval_ms
            )));
        }
        if self.export_every == 0 {
            return Err(ConfigError::ValidationError(
                "export_every must be at least 1".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationError(
                "baud_rate must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ConsoleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.max_setpoint, 85.0);
        assert_eq!(config.export_every, 10);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ConsoleConfig::load_from_str("").unwrap();
        assert_eq!(config.default_setpoint, 75.0);
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = ConsoleConfig::load_from_str(
            r#"
port = "COM7"
baud_rate = 115200
poll_interval_ms = 50
"#,
        )
        .unwrap();
        assert_eq!(config.port, "COM7");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn reject_high_threshold_above_max() {
        let err = ConsoleConfig::load_from_str(
            r#"
max_setpoint = 85.0
high_setpoint_threshold = 90.0
"#,
        );
        assert!(err.is_err());
        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("high_setpoint_threshold"), "got: {msg}");
    }

    #[test]
    fn reject_unordered_interlock_thresholds() {
        let err = ConsoleConfig::load_from_str(
            r#"
warning_threshold = 120.0
critical_threshold = 115.0
"#,
        );
        assert!(err.is_err());
        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("warning_threshold"), "got: {msg}");
    }

    #[test]
    fn reject_zero_warning_timeout() {
        let err = ConsoleConfig::load_from_str("warning_timeout_s = 0.0");
        assert!(err.is_err());
    }

    #[test]
    fn reject_too_fast_poll() {
        let err = ConsoleConfig::load_from_str("poll_interval_ms = 1");
        assert!(err.is_err());
    }

    #[test]
    fn reject_zero_export_every() {
        let err = ConsoleConfig::load_from_str("export_every = 0");
        assert!(err.is_err());
    }

    #[test]
    fn reject_unknown_field() {
        let err = ConsoleConfig::load_from_str("com_port = \"COM7\"");
        assert!(err.is_err());
    }

    #[test]
    fn reject_malformed_toml() {
        let err = ConsoleConfig::load_from_str("this is not valid toml @@@@");
        assert!(matches!(err, Err(ConfigError::ParseError(_))));
    }
}
