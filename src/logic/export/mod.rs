//! Export Module - PDF Report Encoding
//!
//! - `encode`: laid-out report to PDF bytes (lopdf, base-14 fonts)
//! - `export_report`: encode plus file naming and checksum
//! - `ExportedFile::write_to`: atomic write into an export directory

pub mod encoder;
pub mod file;

pub use encoder::encode;
pub use file::{export_report, file_name, ExportedFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported block #{index}: {reason}")]
    UnsupportedBlock { index: usize, reason: String },

    #[error("Invalid page geometry")]
    InvalidGeometry,

    #[error("Report has no pages")]
    EmptyDocument,

    #[error("PDF encoding failed: {0}")]
    Encoding(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests;
