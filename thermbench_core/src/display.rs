//! Display surface seam.
//!
//! The windowing/plot toolkit is an external collaborator. The engine
//! only produces: a one-line title summarizing the latest sample, an
//! ARMED/TRIPPED indicator, and the chart series held in the reading
//! log. `TraceDisplay` renders all of it through `tracing` for
//! headless runs.

use tracing::{debug, info};

use thermbench_common::reading::Reading;

use crate::log::ReadingLog;

/// Heater arming indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// Heater output armed.
    Armed,
    /// Heater output latched off.
    Tripped,
}

/// Consumer of the console's visual state.
pub trait DisplaySurface {
    /// Title summarizing the latest sample.
    fn set_title(&mut self, title: &str);

    /// Heater arming indicator. Must be updated synchronously with
    /// the interlock state change — no stale indicator.
    fn set_indicator(&mut self, state: IndicatorState);

    /// Chart series changed (new reading appended or setpoint moved).
    fn refresh_series(&mut self, log: &ReadingLog, setpoint: f64);

    /// Session reset: drop all series, restore the placeholder title.
    fn clear(&mut self);
}

/// Title before the first sample arrives.
pub const PLACEHOLDER_TITLE: &str = "Setpoint: -- °C | Temp: -- °C | Duty: --% | Mode: --";

/// Title line for one sample.
pub fn format_title(reading: &Reading) -> String {
    format!(
        "Setpoint: {:.1} °C | Temp: {:.2} °C | Duty: {:.1}% | Mode: {}",
        reading.setpoint,
        reading.temperature,
        reading.duty_cycle,
        reading.mode.label()
    )
}

/// Elapsed-time axis label, `mm:ss`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Headless display rendering through `tracing`.
#[derive(Debug, Default)]
pub struct TraceDisplay {
    last_title: String,
    indicator: Option<IndicatorState>,
}

impl TraceDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for TraceDisplay {
    fn set_title(&mut self, title: &str) {
        if title != self.last_title {
            info!(%title, "console");
            self.last_title = title.to_string();
        }
    }

    fn set_indicator(&mut self, state: IndicatorState) {
        if self.indicator != Some(state) {
            match state {
                IndicatorState::Armed => info!("heater indicator: ARMED"),
                IndicatorState::Tripped => info!("heater indicator: TRIPPED"),
            }
            self.indicator = Some(state);
        }
    }

    fn refresh_series(&mut self, log: &ReadingLog, setpoint: f64) {
        let elapsed = log.latest().map(|r| format_elapsed(r.elapsed_seconds));
        debug!(
            points = log.len(),
            setpoint,
            elapsed = elapsed.as_deref().unwrap_or("--:--"),
            "series refreshed"
        );
    }

    fn clear(&mut self) {
        self.last_title.clear();
        info!("display cleared");
    }
}
