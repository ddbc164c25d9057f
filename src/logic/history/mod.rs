//! History Module - Scan Records & Statistics
//!
//! - `ScanRecord` / `ScanStats`: stored scans and per-submitter counters
//! - `RecordStore`: trait with SQLite and remote HTTP implementations

pub mod record;
pub mod remote;
pub mod store;

pub use record::{compute_stats, local_midnight, sort_newest_first, ScanRecord, ScanStats};
pub use remote::RemoteRecordStore;
pub use store::{RecordStore, SqliteRecordStore, ALL_RECORDS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    #[error("Store server error: {0}")]
    Server(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server(code) => *code >= 500 || *code == 429,
            Self::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
