//! Commands - Operations for the display layer
//!
//! Every public command returns `Result<T, String>` with a user-facing
//! message. Internal helpers work in `AppResult`. Store calls and report
//! writing are blocking and run on tokio's blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::logic::analysis::{validate_submission, AnalysisResult, ContentKind, Severity, Submission, SubmitterInfo};
use crate::logic::busy::{BusyOperation, BusyRegistry};
use crate::logic::explain::{aggregate, IndicatorList};
use crate::logic::export::export_report;
use crate::logic::history::{RecordStore, RemoteRecordStore, ScanRecord, ScanStats, SqliteRecordStore, StoreError};
use crate::logic::presentation::{present, ViewModel};
use crate::logic::report::layout;
use crate::logic::service::{ClassifierClient, HealthResponse, ServiceConfig};

/// Characters of content shown per history entry
const PREVIEW_CHARS: usize = 80;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Who is running the commands
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user_id: String,
    pub submitter: SubmitterInfo,
}

/// Everything the commands talk to
pub struct Services {
    client: ClassifierClient,
    store: Arc<dyn RecordStore>,
    busy: BusyRegistry,
    export_dir: PathBuf,
}

/// Analysis plus its derived views
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub record_id: Option<String>,
    pub submission: Submission,
    pub result: AnalysisResult,
    pub indicators: IndicatorList,
    pub view: ViewModel,
}

/// One row of the history list
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub kind: ContentKind,
    pub preview: String,
    pub is_phishing: bool,
    pub risk_score: i32,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl From<&ScanRecord> for HistoryEntry {
    fn from(record: &ScanRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.kind(),
            preview: record.submission.preview(PREVIEW_CHARS),
            is_phishing: record.result.is_phishing,
            risk_score: record.result.clamped_risk(),
            severity: record.result.severity,
            created_at: record.created_at,
        }
    }
}

impl Services {
    /// Build from configuration: remote store when a store URL is set,
    /// otherwise the local SQLite file
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = ClassifierClient::new(ServiceConfig {
            base_url: config.api_url.clone(),
            timeout_seconds: config.timeout_secs,
        })?;

        let store: Arc<dyn RecordStore> = match &config.store_url {
            Some(url) => {
                log::info!("Using remote scan history: {}", url);
                Arc::new(RemoteRecordStore::new(url.clone(), config.timeout_secs))
            }
            None => Arc::new(SqliteRecordStore::open(&config.db_path)?),
        };

        Ok(Self::with_parts(client, store, config.export_dir.clone()))
    }

    pub fn with_parts(client: ClassifierClient, store: Arc<dyn RecordStore>, export_dir: PathBuf) -> Self {
        Self {
            client,
            store,
            busy: BusyRegistry::new(),
            export_dir,
        }
    }

    pub fn busy(&self) -> &BusyRegistry {
        &self.busy
    }

    /// Run one store call on the blocking pool
    async fn with_store<T, F>(&self, call: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RecordStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || call(store.as_ref())).await??)
    }
}

// ============================================================================
// ANALYSIS COMMANDS
// ============================================================================

/// Validate, classify, and optionally store one submission
pub async fn analyze_content(
    services: &Services,
    session: &Session,
    submission: Submission,
    save: bool,
) -> Result<AnalysisOutcome, String> {
    run_analysis(services, session, submission, save)
        .await
        .map_err(|e| e.user_message())
}

async fn run_analysis(
    services: &Services,
    session: &Session,
    submission: Submission,
    save: bool,
) -> AppResult<AnalysisOutcome> {
    let submission = validate_submission(submission)?;
    let result = services.client.analyze(&submission).await?;

    let record_id = if save {
        let record = ScanRecord::new(session.user_id.clone(), submission.clone(), result.clone());
        let id = record.id.clone();
        services.with_store(move |store| store.append(&record)).await?;
        Some(id)
    } else {
        None
    };

    Ok(outcome(record_id, submission, result))
}

fn outcome(record_id: Option<String>, submission: Submission, result: AnalysisResult) -> AnalysisOutcome {
    let indicators = aggregate(&result);
    let view = present(&result, &indicators);
    AnalysisOutcome {
        record_id,
        submission,
        result,
        indicators,
        view,
    }
}

/// Check the classification service
pub async fn check_health(services: &Services) -> Result<HealthResponse, String> {
    services
        .client
        .health()
        .await
        .map_err(|e| AppError::from(e).user_message())
}

// ============================================================================
// HISTORY COMMANDS
// ============================================================================

pub async fn get_history(services: &Services, session: &Session, limit: usize) -> Result<Vec<HistoryEntry>, String> {
    let user_id = session.user_id.clone();
    services
        .with_store(move |store| store.list_by_submitter(&user_id, limit))
        .await
        .map(|records| records.iter().map(HistoryEntry::from).collect())
        .map_err(|e| e.user_message())
}

pub async fn get_stats(services: &Services, session: &Session) -> Result<ScanStats, String> {
    let user_id = session.user_id.clone();
    services
        .with_store(move |store| store.stats(&user_id))
        .await
        .map_err(|e| e.user_message())
}

/// Load a stored scan with its derived views
pub async fn get_record(services: &Services, record_id: &str) -> Result<AnalysisOutcome, String> {
    load_record(services, record_id)
        .await
        .map(|record| outcome(Some(record.id), record.submission, record.result))
        .map_err(|e| e.user_message())
}

async fn load_record(services: &Services, record_id: &str) -> AppResult<ScanRecord> {
    let id = record_id.to_string();
    services
        .with_store(move |store| store.get(&id))
        .await?
        .ok_or_else(|| AppError::NotFound(record_id.to_string()))
}

/// Delete a stored scan; rejected while the same record is being exported
pub async fn delete_record(services: &Services, record_id: &str) -> Result<(), String> {
    let _guard = services
        .busy
        .try_acquire(record_id, BusyOperation::Delete)
        .map_err(|e| AppError::from(e).user_message())?;

    let id = record_id.to_string();
    match services.with_store(move |store| store.delete(&id)).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::NotFound(record_id.to_string()).user_message()),
        Err(e) => Err(e.user_message()),
    }
}

// ============================================================================
// EXPORT COMMANDS
// ============================================================================

/// Export a stored scan; rejected while the same record is busy
pub async fn export_record(services: &Services, session: &Session, record_id: &str) -> Result<PathBuf, String> {
    let _guard = services
        .busy
        .try_acquire(record_id, BusyOperation::Export)
        .map_err(|e| AppError::from(e).user_message())?;

    let exported = async {
        let record = load_record(services, record_id).await?;
        write_report(services, session, record.submission, record.result).await
    };
    exported.await.map_err(|e| e.user_message())
}

/// Export a fresh analysis that was not stored
pub async fn export_outcome(services: &Services, session: &Session, outcome: &AnalysisOutcome) -> Result<PathBuf, String> {
    write_report(services, session, outcome.submission.clone(), outcome.result.clone())
        .await
        .map_err(|e| e.user_message())
}

/// Lay out, encode and write one report on the blocking pool
async fn write_report(
    services: &Services,
    session: &Session,
    submission: Submission,
    result: AnalysisResult,
) -> AppResult<PathBuf> {
    let submitter = session.submitter.clone();
    let export_dir = services.export_dir.clone();

    tokio::task::spawn_blocking(move || -> AppResult<PathBuf> {
        let indicators = aggregate(&result);
        let doc = layout(&result, &indicators, &submission, &submitter);
        let file = export_report(&doc, submission.kind(), Utc::now())?;
        Ok(file.write_to(&export_dir)?)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fixtures::{email_submission, result, submitter, url_scenario};
    use tempfile::tempdir;

    fn services(export_dir: PathBuf) -> (Services, Arc<SqliteRecordStore>) {
        let store = Arc::new(SqliteRecordStore::open_in_memory().unwrap());
        let client = ClassifierClient::new(ServiceConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_seconds: 2,
        })
        .unwrap();
        let services = Services::with_parts(client, store.clone(), export_dir);
        (services, store)
    }

    fn session() -> Session {
        Session {
            user_id: "alice".into(),
            submitter: submitter(),
        }
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_network() {
        let dir = tempdir().unwrap();
        let (services, _) = services(dir.path().to_path_buf());

        let err = analyze_content(&services, &session(), Submission::Sms { message: "   ".into() }, true)
            .await
            .unwrap_err();
        assert_eq!(err, "Invalid input: SMS message must not be empty");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_retryable_message() {
        let dir = tempdir().unwrap();
        let (services, store) = services(dir.path().to_path_buf());

        let err = analyze_content(&services, &session(), email_submission(), true)
            .await
            .unwrap_err();
        assert!(err.starts_with("Classification service unavailable"));
        assert!(err.ends_with("Please try again."));
        assert!(store.list_by_submitter("alice", 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_stats_and_record() {
        let dir = tempdir().unwrap();
        let (services, store) = services(dir.path().to_path_buf());
        let rec = ScanRecord::new("alice", email_submission(), result(true, None));
        store.append(&rec).unwrap();
        store
            .append(&ScanRecord::new("alice", Submission::Url { url: "http://x.tk".into() }, url_scenario()))
            .unwrap();

        let history = get_history(&services, &session(), 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|h| h.is_phishing));

        let stats = get_stats(&services, &session()).await.unwrap();
        assert_eq!(stats.total_scans, 2);
        assert_eq!(stats.threats_detected, 2);

        let loaded = get_record(&services, &rec.id).await.unwrap();
        assert_eq!(loaded.record_id.as_deref(), Some(rec.id.as_str()));
        assert_eq!(loaded.view.banner.headline, "Phishing Detected!");
    }

    #[tokio::test]
    async fn test_export_record_writes_pdf() {
        let dir = tempdir().unwrap();
        let (services, store) = services(dir.path().join("exports"));
        let rec = ScanRecord::new("alice", Submission::Url { url: "http://1.2.3.4/x".into() }, url_scenario());
        store.append(&rec).unwrap();

        let path = export_record(&services, &session(), &rec.id).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("PhishGuard_URL_Report_"));
        assert!(name.ends_with(".pdf"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
        assert!(!services.busy().is_busy(&rec.id));
    }

    #[tokio::test]
    async fn test_busy_record_rejects_second_operation() {
        let dir = tempdir().unwrap();
        let (services, store) = services(dir.path().to_path_buf());
        let rec = ScanRecord::new("alice", email_submission(), result(false, None));
        store.append(&rec).unwrap();

        let guard = services.busy().try_acquire(&rec.id, BusyOperation::Export).unwrap();
        let err = delete_record(&services, &rec.id).await.unwrap_err();
        assert!(err.contains("busy"));
        assert!(store.get(&rec.id).unwrap().is_some());

        drop(guard);
        delete_record(&services, &rec.id).await.unwrap();
        assert!(store.get(&rec.id).unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_store_and_export_on_multi_thread_runtime() {
        let dir = tempdir().unwrap();
        let (services, store) = services(dir.path().to_path_buf());
        let rec = ScanRecord::new("alice", Submission::Sms { message: "Parcel held".into() }, result(true, None));
        store.append(&rec).unwrap();

        let history = get_history(&services, &session(), 5).await.unwrap();
        assert_eq!(history[0].id, rec.id);
        assert_eq!(get_stats(&services, &session()).await.unwrap().total_scans, 1);

        let path = export_record(&services, &session(), &rec.id).await.unwrap();
        assert!(path.exists());

        delete_record(&services, &rec.id).await.unwrap();
        assert!(get_history(&services, &session(), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_record() {
        let dir = tempdir().unwrap();
        let (services, _) = services(dir.path().to_path_buf());

        assert_eq!(delete_record(&services, "nope").await.unwrap_err(), "Scan not found: nope");
        assert_eq!(
            export_record(&services, &session(), "nope").await.unwrap_err(),
            "Scan not found: nope"
        );
    }
}
