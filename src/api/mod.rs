//! API Module
//!
//! Operations the display layer invokes. Each returns a user-facing
//! string error.

pub mod commands;

pub use commands::*;
