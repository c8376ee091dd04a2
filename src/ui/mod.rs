//! Human-facing output
//!
//! Everything printed to stdout for the operator goes through here. Each view
//! is rendered into a `String` first so tests can check it without a terminal.

pub mod display;
