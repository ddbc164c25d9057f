use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::encoder::encode;
use super::ExportError;
use crate::logic::analysis::ContentKind;
use crate::logic::report::ReportDocument;

/// An encoded report, ready to be written
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Hex SHA-256 of `bytes`
    pub sha256: String,
}

/// `PhishGuard_<Email|SMS|URL>_Report_<unix-millis>.pdf`
pub fn file_name(kind: ContentKind, at: DateTime<Utc>) -> String {
    format!("PhishGuard_{}_Report_{}.pdf", kind.label(), at.timestamp_millis())
}

/// Encode `doc` and name the result after `kind` and `at`
pub fn export_report(doc: &ReportDocument, kind: ContentKind, at: DateTime<Utc>) -> Result<ExportedFile, ExportError> {
    let bytes = encode(doc)?;
    let sha256 = hex::encode(Sha256::digest(&bytes));

    Ok(ExportedFile {
        file_name: file_name(kind, at),
        bytes,
        sha256,
    })
}

impl ExportedFile {
    /// Write into `dir`, creating it if needed.
    ///
    /// Bytes go to a temporary sibling first and are renamed into place,
    /// so a failed write never leaves a truncated report behind.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;

        let target = dir.join(&self.file_name);
        let partial = dir.join(format!("{}.part", self.file_name));

        if let Err(e) = fs::write(&partial, &self.bytes) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&partial, &target) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        log::info!("Report exported: {} ({} bytes)", target.display(), self.bytes.len());
        Ok(target)
    }
}
