//! Record Store - Scan History Persistence
//!
//! - `RecordStore`: the operations the command layer needs
//! - `SqliteRecordStore`: local file or in-memory database

use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::record::{compute_stats, local_midnight, ScanRecord, ScanStats};
use super::StoreError;

/// Upper bound used when every record is needed
pub const ALL_RECORDS: usize = usize::MAX;

pub trait RecordStore: Send + Sync {
    fn append(&self, record: &ScanRecord) -> Result<(), StoreError>;

    /// Newest first, at most `limit` records
    fn list_by_submitter(&self, submitter_id: &str, limit: usize) -> Result<Vec<ScanRecord>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<ScanRecord>, StoreError>;

    /// Returns false when nothing was deleted
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Counts only records that decode, so totals agree with the history list
    fn stats(&self, submitter_id: &str) -> Result<ScanStats, StoreError> {
        let records = self.list_by_submitter(submitter_id, ALL_RECORDS)?;
        Ok(compute_stats(&records, local_midnight(Local::now())))
    }
}

// ============================================================================
// SQLITE
// ============================================================================

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS scans (
        id              TEXT PRIMARY KEY,
        submitter_id    TEXT NOT NULL,
        kind            TEXT NOT NULL,
        is_phishing     INTEGER NOT NULL,
        submission_json TEXT NOT NULL,
        result_json     TEXT NOT NULL,
        created_at      TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_scans_submitter_created
        ON scans (submitter_id, created_at DESC);
";

const RECORD_COLUMNS: &str = "id, submitter_id, submission_json, result_json, created_at";

pub struct SqliteRecordStore {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        log::info!("Scan history opened: {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

/// Fixed-width UTC timestamp; sorts lexically in time order
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

type RawRow = (String, String, String, String, String);

fn decode(raw: RawRow) -> Result<ScanRecord, StoreError> {
    let (id, submitter_id, submission_json, result_json, created_at) = raw;
    Ok(ScanRecord {
        id,
        submitter_id,
        submission: serde_json::from_str(&submission_json)?,
        result: serde_json::from_str(&result_json)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?
            .with_timezone(&Utc),
    })
}

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

impl RecordStore for SqliteRecordStore {
    fn append(&self, record: &ScanRecord) -> Result<(), StoreError> {
        let submission_json = serde_json::to_string(&record.submission)?;
        let result_json = serde_json::to_string(&record.result)?;

        self.conn.lock().execute(
            "INSERT INTO scans (id, submitter_id, kind, is_phishing, submission_json, result_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.submitter_id,
                record.kind().as_str(),
                record.result.is_phishing,
                submission_json,
                result_json,
                timestamp(record.created_at),
            ],
        )?;

        log::info!("Scan saved: {} ({})", record.id, record.kind());
        Ok(())
    }

    fn list_by_submitter(&self, submitter_id: &str, limit: usize) -> Result<Vec<ScanRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM scans WHERE submitter_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        ))?;

        let raw = stmt
            .query_map(params![submitter_id, limit], read_raw)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for row in raw {
            let id = row.0.clone();
            match decode(row) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping unreadable scan {}: {}", id, e),
            }
        }
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<Option<ScanRecord>, StoreError> {
        let raw = self
            .conn
            .lock()
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM scans WHERE id = ?1"),
                params![id],
                read_raw,
            )
            .optional()?;

        raw.map(decode).transpose()
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.conn.lock().execute("DELETE FROM scans WHERE id = ?1", params![id])?;
        if removed > 0 {
            log::info!("Scan deleted: {}", id);
        }
        Ok(removed > 0)
    }
}
