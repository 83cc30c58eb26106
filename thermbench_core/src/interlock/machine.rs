//! Safety interlock state machine.
//!
//! Consumes one temperature sample per poll tick and decides whether
//! to raise a time-bounded warning, trip a critical shutdown, or do
//! nothing. Guards guarantee at most one alarm per uninterrupted
//! excursion: a re-entrant trigger while an alarm is active is a
//! no-op, and a resolved excursion stays latched until the
//! temperature recovers below its threshold.
//!
//! The machine never performs side effects itself. It returns
//! [`AlarmRequest`] / [`WarningOutcome`] values; the session owns the
//! heater-stop command and the display indicator. The one exception
//! is the flag latch: [`InterlockMachine::latch_heater_off`] records
//! the authoritative local state (`heater_on = false`,
//! `estop_engaged = true`) regardless of whether the stop command
//! physically reached the device.

/// Interlock flag snapshot, exactly one mutable instance per session.
///
/// Reset to `{false, false, false, true}` on session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterlockFlags {
    /// A warning alarm is raised and awaiting an operator decision.
    pub warning_100_active: bool,
    /// The critical trip is latched (clears when T falls back below
    /// the critical threshold).
    pub critical_115_active: bool,
    /// Heater output is latched off; cleared only by session reset or
    /// an accepted setpoint (re-arm).
    pub estop_engaged: bool,
    /// Heater output state as locally known.
    pub heater_on: bool,
}

impl InterlockFlags {
    /// Session-start flags: no alarms, heater armed.
    pub const fn armed() -> Self {
        Self {
            warning_100_active: false,
            critical_115_active: false,
            estop_engaged: false,
            heater_on: true,
        }
    }
}

impl Default for InterlockFlags {
    fn default() -> Self {
        Self::armed()
    }
}

/// Current interlock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterlockState {
    /// No excursion in progress.
    Normal,
    /// Warning excursion (T above the warning threshold).
    ///
    /// `resolved` flips once the operator decision (or its timeout)
    /// has been applied; the excursion then stays latched, raising
    /// nothing further until the temperature recovers.
    Warning100 {
        /// Operator decision already applied.
        resolved: bool,
    },
    /// Critical excursion (T above the critical threshold).
    Critical115 {
        /// Operator has acknowledged the trip.
        acknowledged: bool,
    },
    /// Manual emergency stop raised, awaiting acknowledgment.
    EstopLatched,
}

/// Alarm the session must raise for the current sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlarmRequest {
    /// Nothing to do this tick.
    None,
    /// Raise the time-bounded warning prompt for this temperature.
    Warning(f64),
    /// Critical trip: force the heater off in the same tick, then
    /// request acknowledgment.
    Critical(f64),
}

/// What the session must do after a warning decision is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningOutcome {
    /// Operator overrode the warning — heater stays on.
    HeaterStaysOn,
    /// Power-off chosen, dialog closed, or window elapsed — force the
    /// heater off.
    ForceHeaterOff,
}

/// The interlock state machine.
#[derive(Debug, Clone)]
pub struct InterlockMachine {
    state: InterlockState,
    flags: InterlockFlags,
    /// Warning threshold [°C].
    warning_threshold: f64,
    /// Critical threshold [°C].
    critical_threshold: f64,
}

impl InterlockMachine {
    /// Create a machine in `Normal` with armed flags.
    pub const fn new(warning_threshold: f64, critical_threshold: f64) -> Self {
        Self {
            state: InterlockState::Normal,
            flags: InterlockFlags::armed(),
            warning_threshold,
            critical_threshold,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> InterlockState {
        self.state
    }

    /// Current flag snapshot.
    #[inline]
    pub const fn flags(&self) -> InterlockFlags {
        self.flags
    }

    /// Whether the heater output is locally known to be on.
    #[inline]
    pub const fn heater_on(&self) -> bool {
        self.flags.heater_on
    }

    /// Evaluate one temperature sample.
    ///
    /// Transition table:
    /// - `T > critical`: any non-critical state → `Critical115`,
    ///   request [`AlarmRequest::Critical`]. Idempotent while the
    ///   excursion lasts.
    /// - `critical ≥ T > warning`: `Normal` → `Warning100`, request
    ///   [`AlarmRequest::Warning`]. No-op while an excursion or an
    ///   unacknowledged alarm is active. Leaving `Critical115` this
    ///   way clears the critical latch first; a warning may then
    ///   raise on the next sample.
    /// - `T ≤ warning`: clears `Warning100` (auto-clear on recovery,
    ///   no operator action) and `Critical115` back to `Normal`.
    pub fn on_sample(&mut self, temperature: f64) -> AlarmRequest {
        use InterlockState::*;

        if temperature > self.critical_threshold {
            return match self.state {
                Critical115 { .. } => AlarmRequest::None,
                Normal | Warning100 { .. } | EstopLatched => {
                    self.state = Critical115 {
                        acknowledged: false,
                    };
                    self.flags.warning_100_active = false;
                    self.flags.critical_115_active = true;
                    AlarmRequest::Critical(temperature)
                }
            };
        }

        if temperature > self.warning_threshold {
            return match self.state {
                Normal => {
                    self.state = Warning100 { resolved: false };
                    self.flags.warning_100_active = true;
                    AlarmRequest::Warning(temperature)
                }
                // Excursion already handled, estop ack pending, or
                // critical latch clearing: coalesce, raise nothing.
                Warning100 { .. } | EstopLatched => AlarmRequest::None,
                Critical115 { .. } => {
                    self.state = Normal;
                    self.flags.critical_115_active = false;
                    AlarmRequest::None
                }
            };
        }

        // T at or below the warning threshold: recovery.
        match self.state {
            Warning100 { .. } => {
                self.state = Normal;
                self.flags.warning_100_active = false;
            }
            Critical115 { .. } => {
                self.state = Normal;
                self.flags.critical_115_active = false;
            }
            Normal | EstopLatched => {}
        }
        AlarmRequest::None
    }

    /// Apply the operator decision for a pending warning.
    ///
    /// `Override` keeps the heater on; `PowerOff` and `Timeout` force
    /// it off. Either way the excursion is marked resolved, so the
    /// heater is forced off at most once per uninterrupted excursion.
    pub fn resolve_warning(&mut self, decision: super::prompt::WarningDecision) -> WarningOutcome {
        use super::prompt::WarningDecision;

        if self.state != (InterlockState::Warning100 { resolved: false }) {
            return WarningOutcome::HeaterStaysOn;
        }
        self.state = InterlockState::Warning100 { resolved: true };
        self.flags.warning_100_active = false;

        match decision {
            WarningDecision::Override => WarningOutcome::HeaterStaysOn,
            WarningDecision::PowerOff | WarningDecision::Timeout => {
                WarningOutcome::ForceHeaterOff
            }
        }
    }

    /// Operator acknowledged the critical trip.
    ///
    /// The trip stays latched until the temperature recovers; the
    /// heater is never re-enabled here.
    pub fn acknowledge_critical(&mut self) {
        if let InterlockState::Critical115 { .. } = self.state {
            self.state = InterlockState::Critical115 { acknowledged: true };
        }
    }

    /// Manual emergency stop request.
    ///
    /// Returns `true` when the acknowledgment prompt must be raised;
    /// `false` when an E-Stop is already pending (idempotent raise).
    /// The caller forces the heater off either way. Any excursion in
    /// progress is superseded: both alarm flags clear, since the
    /// recovery arms of [`on_sample`](Self::on_sample) will no longer
    /// see the overwritten excursion state.
    pub fn emergency_stop(&mut self) -> bool {
        if self.state == InterlockState::EstopLatched {
            return false;
        }
        self.state = InterlockState::EstopLatched;
        self.flags.warning_100_active = false;
        self.flags.critical_115_active = false;
        self.flags.estop_engaged = true;
        true
    }

    /// Operator acknowledged the emergency stop. `estop_engaged`
    /// stays latched.
    pub fn acknowledge_estop(&mut self) {
        if self.state == InterlockState::EstopLatched {
            self.state = InterlockState::Normal;
        }
    }

    /// Record the heater-off side effect. Unconditional: the local
    /// latched state is authoritative regardless of whether the stop
    /// command reached the device.
    pub fn latch_heater_off(&mut self) {
        self.flags.heater_on = false;
        self.flags.estop_engaged = true;
    }

    /// Re-arm after an accepted setpoint: clears `estop_engaged`
    /// only. Heater output is not re-enabled automatically.
    pub fn rearm(&mut self) {
        self.flags.estop_engaged = false;
    }

    /// Session reset: all alarms cleared, heater armed.
    pub fn reset(&mut self) {
        self.state = InterlockState::Normal;
        self.flags = InterlockFlags::armed();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
