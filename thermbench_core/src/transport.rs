//! Transport module root.
//!
//! `TelemetryLink` backends: the real serial port and the scripted
//! in-memory link used by tests and simulation runs.

pub mod serial;
pub mod sim;

pub use serial::SerialLink;
pub use sim::ScriptedLink;
