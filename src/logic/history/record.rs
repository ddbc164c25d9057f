use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::analysis::{AnalysisResult, ContentKind, Submission};

/// One stored scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub submitter_id: String,
    pub submission: Submission,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl ScanRecord {
    pub fn new(submitter_id: impl Into<String>, submission: Submission, result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            submitter_id: submitter_id.into(),
            submission,
            result,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.submission.kind()
    }
}

/// Per-submitter scan counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_scans: usize,
    pub threats_detected: usize,
    pub safe_content: usize,
    pub today_scans: usize,
}

pub fn compute_stats(records: &[ScanRecord], since: DateTime<Utc>) -> ScanStats {
    let threats = records.iter().filter(|r| r.result.is_phishing).count();
    ScanStats {
        total_scans: records.len(),
        threats_detected: threats,
        safe_content: records.len() - threats,
        today_scans: records.iter().filter(|r| r.created_at >= since).count(),
    }
}

/// Start of the local day containing `now`, in UTC
pub fn local_midnight(now: DateTime<Local>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or_else(|| (now - Duration::hours(24)).with_timezone(&Utc))
}

/// Newest first; ties keep their incoming order
pub fn sort_newest_first(records: &mut [ScanRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
