//! Classification Service Client
//!
//! HTTP client for the external phishing classifier.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::analysis::{AnalysisResult, Submission};

/// Classification service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        use crate::constants;

        Self {
            base_url: constants::get_api_url(),
            timeout_seconds: constants::get_timeout_secs(),
        }
    }
}

/// Classification service client
pub struct ClassifierClient {
    config: ServiceConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
pub struct EmailRequest<'a> {
    pub content: &'a str,
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SmsRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UrlRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(default)]
    pub version: Option<String>,
}

impl ClassifierClient {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    /// Check service health
    pub async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let url = format!("{}/health", self.config.base_url);

        let response = self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ServiceError::Parse(e.to_string()))
        } else {
            Err(ServiceError::Server(response.status().as_u16()))
        }
    }

    /// Submit one piece of content for classification
    pub async fn analyze(&self, submission: &Submission) -> Result<AnalysisResult, ServiceError> {
        let url = format!("{}{}", self.config.base_url, endpoint(submission));
        let body = request_body(submission)?;

        log::info!("Submitting {} for analysis: {}", submission.kind(), url);

        let response = self.http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let result: AnalysisResult = response.json().await
                .map_err(|e| ServiceError::Parse(e.to_string()))?;

            log::info!(
                "Analysis complete: phishing={} risk={} severity={}",
                result.is_phishing, result.risk_score, result.severity
            );
            Ok(result)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Analysis failed ({}): {}", status.as_u16(), error_text);
            Err(ServiceError::Server(status.as_u16()))
        }
    }
}

/// Endpoint path for a submission
pub fn endpoint(submission: &Submission) -> &'static str {
    match submission {
        Submission::Email { .. } => "/analyze/email",
        Submission::Sms { .. } => "/analyze/sms",
        Submission::Url { .. } => "/analyze/url",
    }
}

/// JSON body for a submission
pub fn request_body(submission: &Submission) -> Result<serde_json::Value, ServiceError> {
    let value = match submission {
        Submission::Email { subject, sender_email, content } => serde_json::to_value(EmailRequest {
            content,
            subject,
            sender_email: sender_email.as_deref(),
        }),
        Submission::Sms { message } => serde_json::to_value(SmsRequest { message }),
        Submission::Url { url } => serde_json::to_value(UrlRequest { url }),
    };
    value.map_err(|e| ServiceError::Parse(e.to_string()))
}

/// Classification service errors
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ServiceError {
    /// Transport failures and 5xx/429 responses are worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server(code) => *code >= 500 || *code == 429,
            Self::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fixtures::email_submission;

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoint(&email_submission()), "/analyze/email");
        assert_eq!(endpoint(&Submission::Sms { message: "hi".into() }), "/analyze/sms");
        assert_eq!(endpoint(&Submission::Url { url: "http://a.b".into() }), "/analyze/url");
    }

    #[test]
    fn test_email_body_shape() {
        let body = request_body(&email_submission()).unwrap();
        assert_eq!(body["subject"], "URGENT: Your Account Will Be Suspended!");
        assert_eq!(body["sender_email"], "security@paypal-secure.com");
        assert!(body["content"].as_str().unwrap().starts_with("Your PayPal"));
        assert!(body.get("type").is_none());
    }

    #[test]
    fn test_sender_omitted_when_absent() {
        let submission = Submission::Email {
            subject: "s".into(),
            sender_email: None,
            content: "c".into(),
        };
        let body = request_body(&submission).unwrap();
        assert!(body.get("sender_email").is_none());
    }

    #[test]
    fn test_sms_and_url_bodies() {
        let sms = request_body(&Submission::Sms { message: "Your parcel is held".into() }).unwrap();
        assert_eq!(sms, serde_json::json!({ "message": "Your parcel is held" }));

        let url = request_body(&Submission::Url { url: "http://a.tk".into() }).unwrap();
        assert_eq!(url, serde_json::json!({ "url": "http://a.tk" }));
    }

    #[test]
    fn test_retryable() {
        assert!(ServiceError::Network("refused".into()).is_retryable());
        assert!(ServiceError::Server(503).is_retryable());
        assert!(ServiceError::Server(429).is_retryable());
        assert!(!ServiceError::Server(422).is_retryable());
        assert!(!ServiceError::Parse("bad json".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = ClassifierClient::new(ServiceConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_seconds: 2,
        })
        .unwrap();

        let err = client.analyze(&email_submission()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
        assert!(err.is_retryable());
    }
}
