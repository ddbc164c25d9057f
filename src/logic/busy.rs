//! Per-record busy flags.
//!
//! Export and delete on the same record are mutually exclusive. A second
//! request while one is in flight is rejected, not queued.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyOperation {
    Export,
    Delete,
}

impl fmt::Display for BusyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => write!(f, "export"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusyError {
    #[error("Record {record_id} is busy ({running} in progress)")]
    AlreadyBusy {
        record_id: String,
        running: BusyOperation,
    },
}

#[derive(Debug, Default)]
pub struct BusyRegistry {
    inflight: Mutex<HashMap<String, BusyOperation>>,
}

impl BusyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `record_id` busy until the returned guard drops
    pub fn try_acquire(&self, record_id: &str, operation: BusyOperation) -> Result<BusyGuard<'_>, BusyError> {
        let mut inflight = self.inflight.lock();
        if let Some(running) = inflight.get(record_id) {
            log::warn!("Rejected {} of {}: {} in progress", operation, record_id, running);
            return Err(BusyError::AlreadyBusy {
                record_id: record_id.to_string(),
                running: *running,
            });
        }
        inflight.insert(record_id.to_string(), operation);

        Ok(BusyGuard {
            registry: self,
            record_id: record_id.to_string(),
            operation,
        })
    }

    pub fn is_busy(&self, record_id: &str) -> bool {
        self.inflight.lock().contains_key(record_id)
    }

    pub fn running(&self, record_id: &str) -> Option<BusyOperation> {
        self.inflight.lock().get(record_id).copied()
    }
}

/// Clears the busy flag on drop
#[derive(Debug)]
pub struct BusyGuard<'a> {
    registry: &'a BusyRegistry,
    record_id: String,
    operation: BusyOperation,
}

impl BusyGuard<'_> {
    pub fn operation(&self) -> BusyOperation {
        self.operation
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.registry.inflight.lock().remove(&self.record_id);
    }
}
