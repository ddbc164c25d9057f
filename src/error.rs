//! Error handling

use thiserror::Error;

use crate::logic::analysis::ValidationError;
use crate::logic::busy::BusyError;
use crate::logic::export::ExportError;
use crate::logic::history::StoreError;
use crate::logic::service::ServiceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Classification service unavailable: {0}")]
    Service(#[from] ServiceError),

    #[error("Scan history error: {0}")]
    Store(#[from] StoreError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    Busy(#[from] BusyError),

    #[error("Scan not found: {0}")]
    NotFound(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Service(e) => e.is_retryable(),
            AppError::Store(e) => e.is_retryable(),
            AppError::Busy(_) => true,
            _ => false,
        }
    }

    /// Message for the display layer
    pub fn user_message(&self) -> String {
        if self.is_retryable() {
            format!("{}. Please try again.", self)
        } else {
            self.to_string()
        }
    }
}
