//! Console-wide constants.
//!
//! Single source of truth for device defaults, safety thresholds and
//! wire command tokens. Imported by all crates — no duplication
//! permitted.

/// Default serial baud rate for the heater controller.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default operator setpoint [°C].
pub const DEFAULT_SETPOINT: f64 = 75.0;

/// Setpoints at or above this value are rejected outright [°C]
/// (sensor limit is 125 °C; the controller refuses anything ≥ 85).
pub const MAX_SETPOINT: f64 = 85.0;

/// Setpoints above this value require operator confirmation [°C].
pub const HIGH_SETPOINT_THRESHOLD: f64 = 80.0;

/// Temperature above which the warning interlock raises [°C].
pub const TEMP_WARNING_THRESHOLD: f64 = 100.0;

/// Temperature above which the critical interlock trips [°C].
pub const TEMP_CRITICAL_THRESHOLD: f64 = 115.0;

/// Operator decision window for the warning interlock [s].
pub const WARNING_TIMEOUT_S: f64 = 5.0;

/// Default poll loop period [ms].
pub const POLL_INTERVAL_MS: u64 = 100;

/// Accepted readings between periodic export flushes.
pub const EXPORT_EVERY: usize = 10;

/// Settle delay after opening the serial port, before interaction [s].
pub const LINK_SETTLE_DELAY_S: u64 = 2;

/// Default export sink path.
pub const DEFAULT_EXPORT_PATH: &str = "temperature_data.csv";

// ─── Wire Command Tokens ────────────────────────────────────────────
// Outbound commands are newline-terminated ASCII tokens.

/// Stop the heater output.
pub const CMD_HEATER_OFF: &str = "H0";

/// Switch the controller to the autotune routine.
pub const CMD_AUTOTUNE: &str = "AUTOTUNE";

/// Switch the controller to PI control.
pub const CMD_PI: &str = "PI";

/// Setpoint command prefix; the value follows immediately (`S75.5`).
pub const CMD_SETPOINT_PREFIX: &str = "S";
