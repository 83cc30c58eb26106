//! Interlock module root.
//!
//! Over-temperature warning and critical-trip state machine,
//! emergency-stop latching, and the operator prompt seam.

pub mod machine;
pub mod prompt;

pub use machine::{AlarmRequest, InterlockFlags, InterlockMachine, InterlockState, WarningOutcome};
pub use prompt::{HeadlessPrompt, OperatorPrompt, WarningDecision};
