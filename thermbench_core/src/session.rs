//! Poll-loop session.
//!
//! The session is the single explicit context object for one
//! monitoring run: configuration, optional device link, reading log,
//! export sink, interlock machine, command sender, display surface
//! and operator prompt. All work happens on `tick()`, driven by the
//! caller at a fixed interval; there is no concurrency inside.
//!
//! One tick: acquire at most one sample (simulation value or one
//! transport line) → stamp elapsed time → append to the log →
//! periodic export → interlock evaluation (with prompt and
//! heater-off side effects) → display refresh. No sample, no link,
//! or an invalid line is a no-op tick, never an error.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use thermbench_common::config::ConsoleConfig;
use thermbench_common::consts::CMD_HEATER_OFF;
use thermbench_common::link::TelemetryLink;
use thermbench_common::reading::{ControlMode, Reading};

use crate::command::{CommandSender, SetpointOutcome};
use crate::display::{format_title, DisplaySurface, IndicatorState, PLACEHOLDER_TITLE};
use crate::interlock::{AlarmRequest, InterlockFlags, InterlockMachine, OperatorPrompt, WarningOutcome};
use crate::log::{CsvExporter, ReadingLog};
use crate::parser::{parse_telemetry_line, Sample};

/// Duty cycle reported for simulated samples.
const SIM_DUTY_CYCLE: f64 = 50.0;

/// One monitoring session against a heater controller.
pub struct Session {
    config: ConsoleConfig,
    link: Option<Box<dyn TelemetryLink>>,
    log: ReadingLog,
    exporter: CsvExporter,
    interlock: InterlockMachine,
    sender: CommandSender,
    display: Box<dyn DisplaySurface>,
    prompt: Box<dyn OperatorPrompt>,
    /// Injected temperature; when set, the transport is bypassed.
    sim_temperature: Option<f64>,
    /// Session start, zero point of `elapsed_seconds`.
    started: Instant,
}

impl Session {
    /// Create a disconnected session.
    pub fn new(
        config: ConsoleConfig,
        display: Box<dyn DisplaySurface>,
        prompt: Box<dyn OperatorPrompt>,
    ) -> Self {
        let exporter = CsvExporter::new(&config.export_path, config.export_every);
        let interlock =
            InterlockMachine::new(config.warning_threshold, config.critical_threshold);
        let sender = CommandSender::new(
            config.default_setpoint,
            config.max_setpoint,
            config.high_setpoint_threshold,
        );
        let mut session = Self {
            config,
            link: None,
            log: ReadingLog::new(),
            exporter,
            interlock,
            sender,
            display,
            prompt,
            sim_temperature: None,
            started: Instant::now(),
        };
        session.display.set_title(PLACEHOLDER_TITLE);
        session.refresh_indicator();
        session
    }

    /// Attach an opened link.
    ///
    /// The session clock rebases only while the log is empty;
    /// reconnecting mid-session keeps the original time base so the
    /// log stays ordered.
    pub fn connect(&mut self, link: Box<dyn TelemetryLink>) {
        info!(link = link.describe(), "connected");
        self.link = Some(link);
        if self.log.is_empty() {
            self.started = Instant::now();
        }
    }

    /// Detach the link (explicit operator action). The session keeps
    /// running disconnected; ticks become no-ops.
    pub fn disconnect(&mut self) -> Option<Box<dyn TelemetryLink>> {
        if self.link.is_some() {
            info!("disconnected");
        }
        self.link.take()
    }

    #[inline]
    pub const fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Inject (or clear) a simulated temperature. While set, every
    /// tick produces one sample at this value and nothing is sent to
    /// the device.
    pub fn set_sim_temperature(&mut self, temperature: Option<f64>) {
        self.sim_temperature = temperature;
        match temperature {
            Some(t) => info!(temperature = t, "simulating temperature"),
            None => info!("simulation cleared"),
        }
    }

    /// Current commanded setpoint.
    #[inline]
    pub const fn setpoint(&self) -> f64 {
        self.sender.setpoint()
    }

    /// Interlock flag snapshot.
    #[inline]
    pub const fn interlock_flags(&self) -> InterlockFlags {
        self.interlock.flags()
    }

    /// The session reading log.
    #[inline]
    pub fn log(&self) -> &ReadingLog {
        &self.log
    }

    /// Poll-loop period from configuration.
    #[inline]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }

    // ─── Tick Pipeline ──────────────────────────────────────────────

    /// Run one poll tick.
    pub fn tick(&mut self) {
        let Some(sample) = self.acquire_sample() else {
            return;
        };

        let reading = Reading {
            elapsed_seconds: self.started.elapsed().as_secs_f64(),
            setpoint: sample.setpoint,
            temperature: sample.temperature,
            duty_cycle: sample.duty_cycle,
            mode: sample.mode,
        };
        self.log.append(reading);
        self.exporter.maybe_flush(&self.log);

        match self.interlock.on_sample(reading.temperature) {
            AlarmRequest::Critical(t) => {
                // Heater off in the same tick as the trip.
                self.turn_off_heater();
                self.prompt.alert_critical_trip(t);
                self.interlock.acknowledge_critical();
            }
            AlarmRequest::Warning(t) => {
                let window = Duration::from_secs_f64(self.config.warning_timeout_s);
                let decision = self.prompt.warn_high_temperature(t, window);
                if self.interlock.resolve_warning(decision) == WarningOutcome::ForceHeaterOff {
                    self.turn_off_heater();
                }
            }
            AlarmRequest::None => {}
        }

        self.display.set_title(&format_title(&reading));
        self.display.refresh_series(&self.log, self.sender.setpoint());
        self.refresh_indicator();
    }

    /// At most one new sample per tick.
    fn acquire_sample(&mut self) -> Option<Sample> {
        if let Some(temperature) = self.sim_temperature {
            return Some(Sample {
                setpoint: self.sender.setpoint(),
                temperature,
                duty_cycle: SIM_DUTY_CYCLE,
                mode: ControlMode::Pi,
            });
        }

        let link = self.link.as_mut()?;
        match link.read_line() {
            Ok(Some(line)) => parse_telemetry_line(&line),
            Ok(None) => None,
            Err(e) => {
                // Keep polling; reconnection is an explicit operator action.
                warn!("telemetry read failed: {e}");
                None
            }
        }
    }

    // ─── Safety Actions ─────────────────────────────────────────────

    /// Force the heater off.
    ///
    /// Sends the stop command when connected and not simulating;
    /// best-effort — the latched local state is authoritative whether
    /// or not the command reaches the device. The indicator is
    /// updated in the same call.
    pub fn turn_off_heater(&mut self) {
        if self.interlock.heater_on() && self.sim_temperature.is_none() {
            match self.link.as_mut() {
                Some(link) => match link.send_command(CMD_HEATER_OFF) {
                    Ok(()) => info!("heater stop command sent"),
                    Err(e) => warn!("heater stop send failed, state latched anyway: {e}"),
                },
                None => info!("heater turned off (not connected)"),
            }
        } else {
            info!("heater turned off (simulated or already off)");
        }
        self.interlock.latch_heater_off();
        self.refresh_indicator();
    }

    /// Manual emergency stop: heater off, latch engaged, blocking
    /// acknowledgment. Re-entrant requests coalesce into one prompt.
    pub fn emergency_stop(&mut self) {
        let raise = self.interlock.emergency_stop();
        self.turn_off_heater();
        if raise {
            self.prompt.alert_emergency_stop();
            self.interlock.acknowledge_estop();
        }
        info!("emergency stop activated");
    }

    // ─── Operator Commands ──────────────────────────────────────────

    /// Submit raw operator input as a new setpoint.
    pub fn submit_setpoint(&mut self, raw: &str) -> SetpointOutcome {
        let outcome = self.sender.submit_setpoint(
            raw,
            self.link.as_deref_mut(),
            &mut *self.prompt,
            &mut self.interlock,
        );
        self.display.refresh_series(&self.log, self.sender.setpoint());
        self.refresh_indicator();
        outcome
    }

    /// Request a control mode switch.
    pub fn submit_mode(&mut self, mode: ControlMode) {
        self.sender.submit_mode(mode, self.link.as_deref_mut());
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Session reset: clear the log, rebase elapsed time, clear all
    /// interlocks, restore the default setpoint.
    pub fn reset(&mut self) {
        self.log.clear();
        self.started = Instant::now();
        self.interlock.reset();
        self.sender.reset();
        self.display.clear();
        self.display.set_title(PLACEHOLDER_TITLE);
        self.refresh_indicator();
        info!("session reset");
    }

    /// Session end: one final export.
    pub fn shutdown(&mut self) {
        self.exporter.flush(&self.log);
        info!(readings = self.log.len(), "session ended, data saved");
    }

    fn refresh_indicator(&mut self) {
        let state = if self.interlock.flags().estop_engaged {
            IndicatorState::Tripped
        } else {
            IndicatorState::Armed
        };
        self.display.set_indicator(state);
    }
}
