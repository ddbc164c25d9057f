//! Remote Record Store
//!
//! Blocking HTTP store. Some backends reject server-side ordering; the
//! list call then retries unordered and sorts on this side.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::record::{sort_newest_first, ScanRecord};
use super::store::RecordStore;
use super::StoreError;

/// Status codes that mean "ordering not supported here"
const ORDER_REJECTED: [u16; 2] = [400, 501];

pub struct RemoteRecordStore {
    base_url: String,
    timeout: Duration,
}

impl RemoteRecordStore {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    fn scans_url(&self) -> String {
        format!("{}/scans", self.base_url)
    }

    /// Record URL with the id percent-encoded as one path segment
    fn scan_url(&self, id: &str) -> Result<String, StoreError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{} ({})", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("scans")
            .push(id);
        Ok(url.to_string())
    }

    fn fetch_list(&self, submitter_id: &str, limit: usize, ordered: bool) -> Result<ureq::Response, ureq::Error> {
        let mut request = ureq::get(&self.scans_url())
            .timeout(self.timeout)
            .query("submitter_id", submitter_id);
        if ordered {
            request = request
                .query("order", "created_at.desc")
                .query("limit", &limit.to_string());
        }
        request.call()
    }
}

fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, StoreError> {
    let body = response
        .into_string()
        .map_err(|e| StoreError::Network(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

fn map_err(e: ureq::Error) -> StoreError {
    match e {
        ureq::Error::Status(code, _) => StoreError::Server(code),
        other => StoreError::Network(other.to_string()),
    }
}

impl RecordStore for RemoteRecordStore {
    fn append(&self, record: &ScanRecord) -> Result<(), StoreError> {
        let body = serde_json::to_string(record)?;
        ureq::post(&self.scans_url())
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(map_err)?;

        log::info!("Scan saved remotely: {}", record.id);
        Ok(())
    }

    fn list_by_submitter(&self, submitter_id: &str, limit: usize) -> Result<Vec<ScanRecord>, StoreError> {
        match self.fetch_list(submitter_id, limit, true) {
            Ok(response) => read_json(response),
            Err(ureq::Error::Status(code, _)) if ORDER_REJECTED.contains(&code) => {
                log::warn!("Store rejected ordered query ({}), sorting locally", code);
                let response = self.fetch_list(submitter_id, limit, false).map_err(map_err)?;
                let mut records: Vec<ScanRecord> = read_json(response)?;
                sort_newest_first(&mut records);
                records.truncate(limit);
                Ok(records)
            }
            Err(e) => Err(map_err(e)),
        }
    }

    fn get(&self, id: &str) -> Result<Option<ScanRecord>, StoreError> {
        match ureq::get(&self.scan_url(id)?).timeout(self.timeout).call() {
            Ok(response) => read_json(response).map(Some),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(map_err(e)),
        }
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        match ureq::delete(&self.scan_url(id)?).timeout(self.timeout).call() {
            Ok(_) => {
                log::info!("Scan deleted remotely: {}", id);
                Ok(true)
            }
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(map_err(e)),
        }
    }
}
