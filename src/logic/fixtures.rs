//! Shared builders for engine tests.

use crate::logic::analysis::{AnalysisResult, ExplanationPayload, Severity, Submission, SubmitterInfo};

pub fn result(is_phishing: bool, explanation: Option<ExplanationPayload>) -> AnalysisResult {
    AnalysisResult {
        is_phishing,
        confidence: 0.87,
        risk_score: if is_phishing { 82 } else { 12 },
        severity: if is_phishing { Severity::High } else { Severity::Low },
        explanation,
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{} {}", prefix, i)).collect()
}

/// The URL scenario: IP host, suspicious TLD, 90-character URL
pub fn url_scenario() -> AnalysisResult {
    result(
        true,
        Some(ExplanationPayload {
            red_flags: Some(strings(&["IP address used", "Suspicious TLD"])),
            red_flag_count: Some(2),
            has_ip: Some(true),
            suspicious_tld: Some(true),
            url_length: Some(90),
            ..Default::default()
        }),
    )
}

pub fn email_submission() -> Submission {
    Submission::Email {
        subject: "URGENT: Your Account Will Be Suspended!".into(),
        sender_email: Some("security@paypal-secure.com".into()),
        content: "Your PayPal account has been compromised. Verify your identity within 24 hours.".into(),
    }
}

pub fn submitter() -> SubmitterInfo {
    SubmitterInfo {
        user_name: Some("Snehil".into()),
        user_email: Some("snehil@example.com".into()),
    }
}
