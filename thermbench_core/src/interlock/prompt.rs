//! Operator prompt seam.
//!
//! The original console raised modal dialogs; here every alarm is a
//! synchronous call returning a decision value, so the interlock
//! logic is the same whether the prompt is a windowed dialog, a
//! headless policy, or a scripted test double. The warning window is
//! an explicit wait-with-timeout inside the implementation — closing
//! a dialog must map to a decision, never to a hung prompt.

use std::time::Duration;

use tracing::{info, warn};

/// Operator decision for a high-temperature warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningDecision {
    /// Keep the heater running.
    Override,
    /// Force the heater off now.
    PowerOff,
    /// The decision window elapsed without an override.
    Timeout,
}

/// Blocking operator interaction surface.
///
/// At most one prompt is active at a time; the poll loop is gated
/// while a call is in flight (single-threaded, cooperative).
pub trait OperatorPrompt {
    /// High-temperature warning with a bounded decision window.
    ///
    /// Must return within roughly `window`; when no decision arrives
    /// in time the implementation returns
    /// [`WarningDecision::Timeout`].
    fn warn_high_temperature(&mut self, temperature: f64, window: Duration) -> WarningDecision;

    /// Critical over-temperature trip. The heater is already off;
    /// blocks until the operator acknowledges.
    fn alert_critical_trip(&mut self, temperature: f64);

    /// Manual emergency stop engaged. Blocks until acknowledged.
    fn alert_emergency_stop(&mut self);

    /// Confirm a setpoint above the high threshold. `false` declines.
    fn confirm_high_setpoint(&mut self, setpoint: f64) -> bool;

    /// A setpoint at or above the hard limit was rejected.
    fn notify_setpoint_limit(&mut self, setpoint: f64, max_setpoint: f64);
}

/// Prompt policy for unattended runs: always the safe choice.
///
/// Warnings time out (heater off), trips and stops are acknowledged
/// immediately, high setpoints are declined. Everything is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPrompt;

impl OperatorPrompt for HeadlessPrompt {
    fn warn_high_temperature(&mut self, temperature: f64, window: Duration) -> WarningDecision {
        warn!(
            temperature,
            window_s = window.as_secs_f64(),
            "temperature above warning threshold, no operator: heater will shut down"
        );
        WarningDecision::Timeout
    }

    fn alert_critical_trip(&mut self, temperature: f64) {
        warn!(temperature, "CRITICAL temperature trip, heater disabled");
    }

    fn alert_emergency_stop(&mut self) {
        warn!("emergency stop engaged, heater disabled");
    }

    fn confirm_high_setpoint(&mut self, setpoint: f64) -> bool {
        info!(setpoint, "high setpoint declined (headless)");
        false
    }

    fn notify_setpoint_limit(&mut self, setpoint: f64, max_setpoint: f64) {
        warn!(
            setpoint,
            max_setpoint, "setpoint rejected: at or above hard limit"
        );
    }
}
