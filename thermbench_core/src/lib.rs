//! # Thermbench Core Library
//!
//! Engine for the heater controller monitoring console. Drives a
//! single-threaded poll loop that reads one telemetry line per tick,
//! parses it into a typed reading, appends it to the session log,
//! evaluates the safety interlocks, and refreshes the display surface.
//!
//! ## Pipeline (one tick)
//!
//! sample → [`parser`] → [`log`] (append + periodic export) →
//! [`interlock`] evaluation → [`display`] refresh
//!
//! ## Seams
//!
//! The device link (`TelemetryLink`), operator prompts
//! (`OperatorPrompt`) and the display surface (`DisplaySurface`) are
//! traits, so the engine runs identically against a serial port, a
//! scripted transport in tests, or a simulated temperature source.

pub mod command;
pub mod display;
pub mod interlock;
pub mod log;
pub mod parser;
pub mod session;
pub mod transport;
