//! Telemetry data model.
//!
//! One `Reading` per accepted telemetry line. Readings are immutable
//! once created and appended to the session log in arrival order;
//! they are never mutated or removed except on explicit session reset.

use serde::{Deserialize, Serialize};

/// Device control algorithm as reported in the `Mode:` field.
///
/// `#[repr(u8)]` so the exported table stores the mode as a small
/// integer (0 = PI, 1 = Autotune), matching the wire convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlMode {
    /// Proportional-integral control.
    Pi = 0,
    /// Autotune routine running.
    Autotune = 1,
}

impl ControlMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pi),
            1 => Some(Self::Autotune),
            _ => None,
        }
    }

    /// Parse the wire token from a telemetry line.
    ///
    /// The literal token `AUTOTUNE` maps to `Autotune`; any other
    /// token is treated as PI.
    #[inline]
    pub fn from_wire_token(token: &str) -> Self {
        if token == "AUTOTUNE" {
            Self::Autotune
        } else {
            Self::Pi
        }
    }

    /// Display label used in the console title.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pi => "PI",
            Self::Autotune => "AUTOTUNE",
        }
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Pi
    }
}

/// One telemetry sample from the heater controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Seconds since session start (non-negative, non-decreasing
    /// across the log).
    pub elapsed_seconds: f64,
    /// Commanded target temperature at sample time [°C].
    pub setpoint: f64,
    /// Measured temperature [°C].
    pub temperature: f64,
    /// Heater-on percentage per control cycle [0–100].
    pub duty_cycle: f64,
    /// Active control algorithm.
    pub mode: ControlMode,
}
