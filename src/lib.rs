//! PhishGuard Core
//!
//! Phishing analysis client: classification requests, indicator
//! aggregation, on-screen presentation, paginated PDF reports, and scan
//! history.

pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod logic;

pub use error::{AppError, AppResult};
