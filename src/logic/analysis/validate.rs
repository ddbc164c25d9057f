//! Submission validation, run before any request reaches the service.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::types::Submission;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@<>()]+@[^\s@<>()]+\.[A-Za-z]{2,}$").expect("static email pattern")
});

/// Maximum accepted content length (characters)
pub const MAX_CONTENT_CHARS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} is too long (max {MAX_CONTENT_CHARS} characters)")]
    TooLong(&'static str),
    #[error("invalid sender address: {0}")]
    InvalidSender(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate and normalize a submission.
///
/// Trims surrounding whitespace, drops an empty sender address, and
/// prefixes `http://` onto bare hosts.
pub fn validate_submission(submission: Submission) -> Result<Submission, ValidationError> {
    match submission {
        Submission::Email { subject, sender_email, content } => {
            let content = require_text(content, "email content")?;
            let sender_email = match sender_email.map(|s| s.trim().to_string()) {
                Some(s) if s.is_empty() => None,
                Some(s) => {
                    if !EMAIL_RE.is_match(&s) {
                        return Err(ValidationError::InvalidSender(s));
                    }
                    Some(s)
                }
                None => None,
            };
            Ok(Submission::Email {
                subject: subject.trim().to_string(),
                sender_email,
                content,
            })
        }
        Submission::Sms { message } => Ok(Submission::Sms {
            message: require_text(message, "SMS message")?,
        }),
        Submission::Url { url } => {
            let url = require_text(url, "URL")?;
            Ok(Submission::Url { url: normalize_url(&url)? })
        }
    }
}

fn require_text(text: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(ValidationError::TooLong(field));
    }
    Ok(trimmed.to_string())
}

fn normalize_url(raw: &str) -> Result<String, ValidationError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let parsed = reqwest::Url::parse(&candidate)
        .map_err(|e| ValidationError::InvalidUrl(format!("{} ({})", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(candidate),
        _ => Err(ValidationError::InvalidUrl(raw.to_string())),
    }
}
