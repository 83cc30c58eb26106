//! Command sender: operator setpoint and mode requests.
//!
//! Applies the setpoint limits before anything is sent: values at or
//! above the hard limit are rejected outright, values above the high
//! threshold need operator confirmation, and any accepted setpoint
//! re-arms the E-Stop latch (an accepted change is treated as
//! operator confirmation that it is safe to resume). Rejected input
//! resets the displayed value to the configured default. Mode
//! requests are fire-and-forget: not connected means a log line, not
//! an error.

use tracing::{info, warn};

use thermbench_common::consts::{CMD_AUTOTUNE, CMD_PI, CMD_SETPOINT_PREFIX};
use thermbench_common::link::TelemetryLink;
use thermbench_common::reading::ControlMode;

use crate::interlock::{InterlockMachine, OperatorPrompt};

/// Result of a setpoint submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetpointOutcome {
    /// Accepted (and sent when connected); E-Stop latch cleared.
    Accepted(f64),
    /// Input was not a number. Displayed value reset to default.
    RejectedNonNumeric,
    /// Value outside `[0, max_setpoint)`. Reset to default.
    RejectedOutOfRange,
    /// Operator declined the high-setpoint confirmation. Reset to
    /// default.
    Declined,
}

/// Owner of the current commanded setpoint.
#[derive(Debug, Clone)]
pub struct CommandSender {
    /// Current commanded target temperature [°C].
    setpoint: f64,
    default_setpoint: f64,
    max_setpoint: f64,
    high_threshold: f64,
}

impl CommandSender {
    pub const fn new(default_setpoint: f64, max_setpoint: f64, high_threshold: f64) -> Self {
        Self {
            setpoint: default_setpoint,
            default_setpoint,
            max_setpoint,
            high_threshold,
        }
    }

    /// Current commanded setpoint (also the displayed value).
    #[inline]
    pub const fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Restore the default setpoint (session reset).
    pub fn reset(&mut self) {
        self.setpoint = self.default_setpoint;
    }

    /// Submit raw operator input as a new setpoint.
    pub fn submit_setpoint(
        &mut self,
        raw: &str,
        link: Option<&mut (dyn TelemetryLink + '_)>,
        prompt: &mut dyn OperatorPrompt,
        interlock: &mut InterlockMachine,
    ) -> SetpointOutcome {
        let value: f64 = match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(input = raw, "invalid setpoint: enter a number");
                self.setpoint = self.default_setpoint;
                return SetpointOutcome::RejectedNonNumeric;
            }
        };

        if value >= self.max_setpoint || value < 0.0 {
            prompt.notify_setpoint_limit(value, self.max_setpoint);
            self.setpoint = self.default_setpoint;
            return SetpointOutcome::RejectedOutOfRange;
        }

        if value > self.high_threshold && !prompt.confirm_high_setpoint(value) {
            info!(setpoint = value, "high setpoint declined by operator");
            self.setpoint = self.default_setpoint;
            return SetpointOutcome::Declined;
        }

        self.apply_setpoint(value, link);
        interlock.rearm();
        SetpointOutcome::Accepted(value)
    }

    /// Send an accepted setpoint and record it.
    fn apply_setpoint(&mut self, value: f64, link: Option<&mut (dyn TelemetryLink + '_)>) {
        self.setpoint = value;
        match link {
            Some(link) => match link.send_command(&format!("{CMD_SETPOINT_PREFIX}{value}")) {
                Ok(()) => info!(setpoint = value, "setpoint sent"),
                Err(e) => warn!(setpoint = value, "setpoint send failed: {e}"),
            },
            None => info!(setpoint = value, "setpoint set (not connected)"),
        }
    }

    /// Send a control mode request. No retry; not connected is a
    /// console message only.
    pub fn submit_mode(&self, mode: ControlMode, link: Option<&mut (dyn TelemetryLink + '_)>) {
        let token = match mode {
            ControlMode::Autotune => CMD_AUTOTUNE,
            ControlMode::Pi => CMD_PI,
        };
        match link {
            Some(link) => match link.send_command(token) {
                Ok(()) => info!(mode = mode.label(), "mode command sent"),
                Err(e) => warn!(mode = mode.label(), "mode send failed: {e}"),
            },
            None => info!(mode = mode.label(), "not connected, mode request dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interlock::WarningDecision;
    use crate::transport::ScriptedLink;
    use std::time::Duration;

    /// Scripted prompt: confirms or declines high setpoints.
    struct FixedPrompt {
        confirm: bool,
        limit_notices: usize,
    }

    impl FixedPrompt {
        fn confirming(confirm: bool) -> Self {
            Self {
                confirm,
                limit_notices: 0,
            }
        }
    }

    impl OperatorPrompt for FixedPrompt {
        fn warn_high_temperature(&mut self, _: f64, _: Duration) -> WarningDecision {
            WarningDecision::Timeout
        }
        fn alert_critical_trip(&mut self, _: f64) {}
        fn alert_emergency_stop(&mut self) {}
        fn confirm_high_setpoint(&mut self, _: f64) -> bool {
            self.confirm
        }
        fn notify_setpoint_limit(&mut self, _: f64, _: f64) {
            self.limit_notices += 1;
        }
    }

    fn sender() -> CommandSender {
        CommandSender::new(75.0, 85.0, 80.0)
    }

    fn interlock() -> InterlockMachine {
        InterlockMachine::new(100.0, 115.0)
    }

    #[test]
    fn plain_setpoint_accepted_and_sent() {
        let mut s = sender();
        let mut link = ScriptedLink::new();
        let mut prompt = FixedPrompt::confirming(false);
        let mut il = interlock();

        let outcome = s.submit_setpoint("70", Some(&mut link), &mut prompt, &mut il);
        assert_eq!(outcome, SetpointOutcome::Accepted(70.0));
        assert_eq!(s.setpoint(), 70.0);
        assert_eq!(link.sent_commands(), ["S70"]);
    }

    #[test]
    fn at_limit_is_rejected() {
        let mut s = sender();
        let mut prompt = FixedPrompt::confirming(true);
        let mut il = interlock();

        let outcome = s.submit_setpoint("85", None, &mut prompt, &mut il);
        assert_eq!(outcome, SetpointOutcome::RejectedOutOfRange);
        assert_eq!(prompt.limit_notices, 1);
        assert_eq!(s.setpoint(), 75.0);
    }

    #[test]
    fn just_below_limit_needs_confirmation() {
        let mut il = interlock();

        let mut s = sender();
        let mut yes = FixedPrompt::confirming(true);
        let outcome = s.submit_setpoint("84.999", None, &mut yes, &mut il);
        assert_eq!(outcome, SetpointOutcome::Accepted(84.999));

        let mut s = sender();
        let mut no = FixedPrompt::confirming(false);
        let outcome = s.submit_setpoint("84.999", None, &mut no, &mut il);
        assert_eq!(outcome, SetpointOutcome::Declined);
        assert_eq!(s.setpoint(), 75.0);
    }

    #[test]
    fn at_high_threshold_needs_no_confirmation() {
        let mut s = sender();
        let mut no = FixedPrompt::confirming(false);
        let mut il = interlock();

        // Exactly 80 is not above the threshold.
        let outcome = s.submit_setpoint("80", None, &mut no, &mut il);
        assert_eq!(outcome, SetpointOutcome::Accepted(80.0));
    }

    #[test]
    fn non_numeric_resets_to_default() {
        let mut s = sender();
        let mut prompt = FixedPrompt::confirming(true);
        let mut il = interlock();
        s.submit_setpoint("60", None, &mut prompt, &mut il);

        let outcome = s.submit_setpoint("warm", None, &mut prompt, &mut il);
        assert_eq!(outcome, SetpointOutcome::RejectedNonNumeric);
        assert_eq!(s.setpoint(), 75.0);
    }

    #[test]
    fn negative_setpoint_rejected() {
        let mut s = sender();
        let mut prompt = FixedPrompt::confirming(true);
        let mut il = interlock();
        let outcome = s.submit_setpoint("-5", None, &mut prompt, &mut il);
        assert_eq!(outcome, SetpointOutcome::RejectedOutOfRange);
    }

    #[test]
    fn accepted_setpoint_rearms_estop() {
        let mut s = sender();
        let mut prompt = FixedPrompt::confirming(true);
        let mut il = interlock();
        il.emergency_stop();
        il.latch_heater_off();
        il.acknowledge_estop();
        assert!(il.flags().estop_engaged);

        s.submit_setpoint("70", None, &mut prompt, &mut il);
        assert!(!il.flags().estop_engaged);
        // Heater output is not re-enabled by the re-arm.
        assert!(!il.heater_on());
    }

    #[test]
    fn rejected_setpoint_keeps_estop_latched() {
        let mut s = sender();
        let mut prompt = FixedPrompt::confirming(false);
        let mut il = interlock();
        il.emergency_stop();
        il.latch_heater_off();

        s.submit_setpoint("85", None, &mut prompt, &mut il);
        assert!(il.flags().estop_engaged);
    }

    #[test]
    fn mode_commands() {
        let s = sender();
        let mut link = ScriptedLink::new();
        s.submit_mode(ControlMode::Autotune, Some(&mut link));
        s.submit_mode(ControlMode::Pi, Some(&mut link));
        assert_eq!(link.sent_commands(), ["AUTOTUNE", "PI"]);

        // Not connected: silent no-op.
        s.submit_mode(ControlMode::Pi, None);
    }

    #[test]
    fn send_failure_still_records_setpoint() {
        // Best-effort: the local value is authoritative.
        let mut s = sender();
        let mut link = ScriptedLink::new();
        link.fail_sends();
        let mut prompt = FixedPrompt::confirming(true);
        let mut il = interlock();

        let outcome = s.submit_setpoint("70", Some(&mut link), &mut prompt, &mut il);
        assert_eq!(outcome, SetpointOutcome::Accepted(70.0));
        assert_eq!(s.setpoint(), 70.0);
    }
}
