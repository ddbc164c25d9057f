//! Presentation Module - On-Screen View
//!
//! Builds the view model for one analysis result:
//! - Verdict banner and risk metrics
//! - Indicator groups, with the danger and safe groups capped
//! - Degraded notices when counts arrive without detail

pub mod renderer;
pub mod types;

pub use renderer::{present, recommendation, FLAG_DISPLAY_CAP};
pub use types::*;
