//! Telemetry line parser.
//!
//! One line of ASCII telemetry carries four labeled fields:
//!
//! ```text
//! Setpoint: 75.0, Temp: 64.2 C, Duty: 42.5%, Mode: PI, ...
//! ```
//!
//! Parsing locates each fixed label substring and takes the text up to
//! the field's delimiter (or end of line). All four fields must be
//! present and numeric or the whole line is rejected — no
//! partial-field recovery, and never an error to the caller.

use thermbench_common::reading::ControlMode;

/// One successfully parsed telemetry sample (no elapsed time yet —
/// the session stamps that on append).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Setpoint reported by the device [°C].
    pub setpoint: f64,
    /// Measured temperature [°C].
    pub temperature: f64,
    /// Heater duty cycle [%].
    pub duty_cycle: f64,
    /// Active control algorithm.
    pub mode: ControlMode,
}

/// Parse one telemetry line into a [`Sample`].
///
/// Returns `None` if any of the four fields is missing or
/// non-numeric.
pub fn parse_telemetry_line(line: &str) -> Option<Sample> {
    let setpoint = field_after(line, "Setpoint: ", ",")?.trim().parse().ok()?;
    let temperature = field_after(line, "Temp: ", " C")?.trim().parse().ok()?;
    let duty_cycle = field_after(line, "Duty: ", "%")?.trim().parse().ok()?;
    let mode = ControlMode::from_wire_token(field_after(line, "Mode: ", ",")?.trim());

    Some(Sample {
        setpoint,
        temperature,
        duty_cycle,
        mode,
    })
}

/// Text following `label`, up to `delim` (or end of line when the
/// delimiter is absent). `None` when the label itself is missing.
fn field_after<'a>(line: &'a str, label: &str, delim: &str) -> Option<&'a str> {
    let start = line.find(label)? + label.len();
    let rest = &line[start..];
    match rest.find(delim) {
        Some(end) => Some(&rest[..end]),
        None => Some(rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_LINE: &str = "Setpoint: 75.0, Temp: 64.25 C, Duty: 42.5%, Mode: PI,";

    #[test]
    fn parse_well_formed_line() {
        let sample = parse_telemetry_line(GOOD_LINE).unwrap();
        assert_eq!(sample.setpoint, 75.0);
        assert_eq!(sample.temperature, 64.25);
        assert_eq!(sample.duty_cycle, 42.5);
        assert_eq!(sample.mode, ControlMode::Pi);
    }

    #[test]
    fn parse_autotune_mode() {
        let line = "Setpoint: 80, Temp: 70.1 C, Duty: 100%, Mode: AUTOTUNE,";
        let sample = parse_telemetry_line(line).unwrap();
        assert_eq!(sample.mode, ControlMode::Autotune);
        assert_eq!(sample.duty_cycle, 100.0);
    }

    #[test]
    fn unknown_mode_token_maps_to_pi() {
        let line = "Setpoint: 75, Temp: 64 C, Duty: 42%, Mode: WEIRD,";
        let sample = parse_telemetry_line(line).unwrap();
        assert_eq!(sample.mode, ControlMode::Pi);
    }

    #[test]
    fn trailing_field_without_delimiter_is_accepted() {
        // Mode at end of line with no trailing comma.
        let line = "Setpoint: 75, Temp: 64 C, Duty: 42%, Mode: AUTOTUNE";
        let sample = parse_telemetry_line(line).unwrap();
        assert_eq!(sample.mode, ControlMode::Autotune);
    }

    #[test]
    fn missing_field_rejects_whole_line() {
        let line = "Setpoint: 75, Temp: 64 C, Mode: PI,";
        assert_eq!(parse_telemetry_line(line), None);
    }

    #[test]
    fn non_numeric_field_rejects_whole_line() {
        let line = "Setpoint: abc, Temp: 64 C, Duty: 42%, Mode: PI,";
        assert_eq!(parse_telemetry_line(line), None);

        let line = "Setpoint: 75, Temp:  C, Duty: 42%, Mode: PI,";
        assert_eq!(parse_telemetry_line(line), None);
    }

    #[test]
    fn empty_and_garbage_lines_reject() {
        assert_eq!(parse_telemetry_line(""), None);
        assert_eq!(parse_telemetry_line("boot: controller v1.2"), None);
    }

    #[test]
    fn prefix_noise_is_ignored() {
        // Labels are located anywhere in the line.
        let line = "[0042] status Setpoint: 75.0, Temp: 99.9 C, Duty: 1%, Mode: PI,";
        let sample = parse_telemetry_line(line).unwrap();
        assert_eq!(sample.temperature, 99.9);
    }
}
