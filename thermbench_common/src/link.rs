//! Telemetry link trait and error types.
//!
//! This module defines:
//! - `TelemetryLink` trait - Interface for pluggable transport backends
//! - `LinkError` enum - Error types for link operations
//!
//! The console engine talks to the device only through this trait,
//! so the serial backend and the scripted/simulated backend are
//! interchangeable.

use thiserror::Error;

/// Error types for telemetry link operations.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// Opening the link failed (bad port, permissions, unplugged).
    #[error("Failed to open link: {0}")]
    OpenFailed(String),

    /// Read from the link failed.
    #[error("Link read error: {0}")]
    ReadError(String),

    /// Write to the link failed.
    #[error("Link write error: {0}")]
    WriteError(String),

    /// The link is closed.
    #[error("Link is closed")]
    Closed,
}

/// Interface for the byte-oriented connection to the heater controller.
///
/// One telemetry sample arrives as one newline-terminated ASCII line;
/// outbound commands are newline-terminated ASCII tokens.
///
/// # Lifecycle
///
/// 1. The backend is opened before the session starts polling
///    (opening may block, e.g. for a serial settle delay).
/// 2. `read_line()` is called once per poll tick.
/// 3. Dropping the backend closes the connection.
pub trait TelemetryLink: Send {
    /// Human-readable description of the backend (port name, "scripted").
    fn describe(&self) -> &str;

    /// Read at most one telemetry line.
    ///
    /// Returns `Ok(None)` when no complete line is available within
    /// the backend's read timeout — a normal no-op tick, not an error.
    /// The returned line is stripped of its terminator.
    fn read_line(&mut self) -> Result<Option<String>, LinkError>;

    /// Send one command token. The backend appends the newline.
    fn send_command(&mut self, command: &str) -> Result<(), LinkError>;
}
