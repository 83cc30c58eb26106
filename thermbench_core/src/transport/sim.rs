//! Scripted in-memory telemetry link.
//!
//! Fills the same seam as the serial backend for tests and
//! device-free simulation runs: telemetry lines are queued up front,
//! outbound commands are recorded for inspection. The sent-command
//! record is behind an `Arc` so tests can keep a handle after the
//! link is boxed into a session.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use thermbench_common::link::{LinkError, TelemetryLink};

/// Canned-line telemetry link.
#[derive(Debug, Default)]
pub struct ScriptedLink {
    lines: VecDeque<String>,
    sent: Arc<Mutex<Vec<String>>>,
    /// When set, every send fails (exercises best-effort paths).
    fail_sends: bool,
}

impl ScriptedLink {
    /// Empty link: every read is a no-op tick.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link pre-loaded with telemetry lines.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Queue another telemetry line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&mut self) {
        self.fail_sends = true;
    }

    /// Shared handle to the sent-command record; stays valid after
    /// the link is boxed away.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }

    /// Commands sent so far, in order.
    pub fn sent_commands(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl TelemetryLink for ScriptedLink {
    fn describe(&self) -> &str {
        "scripted"
    }

    fn read_line(&mut self) -> Result<Option<String>, LinkError> {
        Ok(self.lines.pop_front())
    }

    fn send_command(&mut self, command: &str) -> Result<(), LinkError> {
        if self.fail_sends {
            return Err(LinkError::WriteError("scripted failure".to_string()));
        }
        self.sent.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_in_order_then_none() {
        let mut link = ScriptedLink::with_lines(["a", "b"]);
        assert_eq!(link.read_line().unwrap().as_deref(), Some("a"));
        assert_eq!(link.read_line().unwrap().as_deref(), Some("b"));
        assert_eq!(link.read_line().unwrap(), None);
    }

    #[test]
    fn records_sent_commands() {
        let mut link = ScriptedLink::new();
        link.send_command("H0").unwrap();
        link.send_command("S75").unwrap();
        assert_eq!(link.sent_commands(), ["H0", "S75"]);
    }

    #[test]
    fn scripted_send_failure() {
        let mut link = ScriptedLink::new();
        link.fail_sends();
        assert!(link.send_command("H0").is_err());
        assert!(link.sent_commands().is_empty());
    }

    #[test]
    fn sent_handle_outlives_the_link() {
        let link = ScriptedLink::new();
        let handle = link.sent_handle();
        let mut boxed: Box<dyn TelemetryLink> = Box::new(link);
        boxed.send_command("PI").unwrap();
        assert_eq!(*handle.lock().unwrap(), ["PI"]);
    }
}
