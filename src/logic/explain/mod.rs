//! Explain Module - Indicator Aggregation
//!
//! Turns one sparse `AnalysisResult` into a flat, ordered list of
//! human-readable indicators. Both the on-screen view and the exported
//! report are built from this list.

pub mod engine;
pub mod flags;
pub mod types;

pub use engine::{aggregate, normalize_text, URL_LENGTH_THRESHOLD};
pub use types::{IndicatorItem, IndicatorKind, IndicatorList, IndicatorSource};
