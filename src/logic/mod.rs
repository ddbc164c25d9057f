//! Logic Module - Analysis Engines & Boundaries
//!
//! Engines (pure, synchronous):
//! - `severity` - Severity label to display tier
//! - `explain` - Sparse result to ordered indicator list
//! - `presentation` - Capped on-screen view model
//! - `report` - Paginated document layout
//! - `export` - PDF encoding and file output
//!
//! Boundaries:
//! - `service` - Classification service client
//! - `history` - Scan record stores and statistics
//! - `busy` - Per-record export/delete exclusion

// Model
pub mod analysis;
pub mod palette;

// Engines
pub mod severity;
pub mod explain;
pub mod presentation;
pub mod report;
pub mod export;

// Boundaries
pub mod service;
pub mod history;
pub mod busy;

#[cfg(test)]
pub mod fixtures;
