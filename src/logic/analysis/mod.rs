//! Analysis Module
//!
//! Strongly typed verdict model returned by the classification service,
//! plus submission validation.
//!
//! ## Structure
//! - `types`: AnalysisResult, ExplanationPayload, Severity, Submission
//! - `validate`: Input checks run before a request leaves the client
//! - `lenient`: Field decoders that degrade mistyped values to `None`

mod lenient;
pub mod types;
pub mod validate;

pub use types::{
    AnalysisResult,
    ContentKind,
    ExplanationPayload,
    FlagValue,
    Severity,
    Submission,
    SubmitterInfo,
    SuspiciousUrl,
};

pub use validate::{validate_submission, ValidationError};
