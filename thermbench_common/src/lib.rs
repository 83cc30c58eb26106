//! Thermbench Common Library
//!
//! Shared types and configuration for the thermbench workspace: the
//! telemetry data model, console constants, the TOML configuration
//! loader, and the `TelemetryLink` transport trait implemented by the
//! serial and simulated backends in `thermbench_core`.
//!
//! # Module Structure
//!
//! - [`reading`] - Telemetry data model (`Reading`, `ControlMode`)
//! - [`consts`] - Console defaults and wire command tokens
//! - [`config`] - `ConsoleConfig` TOML loading and validation
//! - [`link`] - `TelemetryLink` trait and `LinkError`

pub mod config;
pub mod consts;
pub mod link;
pub mod reading;
