//! Serial port telemetry link.
//!
//! Wraps the `serialport` crate: newline-terminated ASCII lines in,
//! newline-terminated command tokens out. Reads are bounded by a
//! short timeout so one poll tick never blocks the loop; bytes
//! arriving between ticks accumulate in an internal buffer until a
//! complete line is available.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::info;

use thermbench_common::consts::LINK_SETTLE_DELAY_S;
use thermbench_common::link::{LinkError, TelemetryLink};

/// Read timeout per poll tick.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial connection to the heater controller.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    description: String,
    /// Bytes received but not yet terminated by a newline.
    pending: Vec<u8>,
}

impl SerialLink {
    /// Open the port and wait the settle delay before interaction
    /// begins (the controller resets on DTR toggle).
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| LinkError::OpenFailed(format!("{path}: {e}")))?;

        info!(port = path, baud_rate, "serial link open, settling");
        std::thread::sleep(Duration::from_secs(LINK_SETTLE_DELAY_S));

        Ok(Self {
            port,
            description: path.to_string(),
            pending: Vec::new(),
        })
    }

    /// Pop one complete line from the pending buffer, if any.
    fn take_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=newline).collect();
        let text = String::from_utf8_lossy(&line);
        Some(text.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl TelemetryLink for SerialLink {
    fn describe(&self) -> &str {
        &self.description
    }

    fn read_line(&mut self) -> Result<Option<String>, LinkError> {
        // Drain a buffered line first so a burst of lines is consumed
        // one per tick, preserving sample ordering.
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; 256];
        match self.port.read(&mut chunk) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.pending.extend_from_slice(&chunk[..n]);
                Ok(self.take_line())
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(LinkError::ReadError(e.to_string())),
        }
    }

    fn send_command(&mut self, command: &str) -> Result<(), LinkError> {
        self.port
            .write_all(format!("{command}\n").as_bytes())
            .map_err(|e| LinkError::WriteError(e.to_string()))
    }
}
