//! Analysis Types
//!
//! Wire-level types for the classifier verdict and the submitted content.
//! No logic beyond lenient decoding lives here.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity label reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    /// Case-insensitive parse; anything unrecognized maps to `Unknown`
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => Severity::parse(&s),
            _ => Severity::Unknown,
        })
    }
}

// ============================================================================
// ANALYSIS RESULT
// ============================================================================

/// Verdict produced by the classification service. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_phishing: bool,
    #[serde(default, deserialize_with = "lenient::fraction")]
    pub confidence: f32,
    #[serde(default, deserialize_with = "lenient::score")]
    pub risk_score: i32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(
        default,
        deserialize_with = "deserialize_explanation",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<ExplanationPayload>,
}

impl AnalysisResult {
    /// Risk score clamped to the 0-100 display range
    pub fn clamped_risk(&self) -> i32 {
        self.risk_score.clamp(0, 100)
    }

    /// Confidence as a percentage, clamped to 0-100
    pub fn confidence_percent(&self) -> f32 {
        if self.confidence.is_finite() {
            (self.confidence * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Stored records sometimes carry `""` in place of a missing explanation,
/// so anything that is not an object decodes as `None`. Sub-fields decode
/// leniently, so a mistyped one never drops the payload.
fn deserialize_explanation<'de, D>(deserializer: D) -> Result<Option<ExplanationPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// ============================================================================
// EXPLANATION PAYLOAD
// ============================================================================

/// Sparse bag of optional sub-signals. `None` means "not measured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationPayload {
    #[serde(deserialize_with = "lenient::strings", skip_serializing_if = "Option::is_none")]
    pub red_flags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub red_flag_count: Option<u32>,
    #[serde(deserialize_with = "lenient::strings", skip_serializing_if = "Option::is_none")]
    pub green_flags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub green_flag_count: Option<u32>,
    #[serde(deserialize_with = "lenient::strings", skip_serializing_if = "Option::is_none")]
    pub keywords_found: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::links", skip_serializing_if = "Option::is_none")]
    pub suspicious_urls: Option<Vec<SuspiciousUrl>>,
    #[serde(deserialize_with = "lenient::strings", skip_serializing_if = "Option::is_none")]
    pub safe_urls: Option<Vec<String>>,

    // Scalar metrics
    #[serde(rename = "phishing_keywords", deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub phishing_keyword_count: Option<u32>,
    #[serde(alias = "urls_count", deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub url_count: Option<u32>,
    #[serde(deserialize_with = "lenient::ratio", skip_serializing_if = "Option::is_none")]
    pub uppercase_ratio: Option<f32>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub text_length: Option<u32>,
    #[serde(deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub url_length: Option<u32>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub has_ip: Option<bool>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub suspicious_tld: Option<bool>,
    #[serde(deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,

    /// Named email indicators (up to 40), independently populated
    #[serde(deserialize_with = "lenient::summary", skip_serializing_if = "Option::is_none")]
    pub red_flags_summary: Option<BTreeMap<String, FlagValue>>,
}

/// Link flagged by the URL scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousUrl {
    pub url: String,
    /// Percentage, 0-100
    #[serde(default, deserialize_with = "lenient::risk")]
    pub risk: i32,
}

/// Value of one entry in `red_flags_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Flag(bool),
    Phrases(Vec<String>),
    /// Anything else the service sends; never treated as set
    Other(serde_json::Value),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        matches!(self, FlagValue::Flag(true))
    }

    pub fn phrases(&self) -> &[String] {
        match self {
            FlagValue::Phrases(p) => p,
            _ => &[],
        }
    }
}

// ============================================================================
// SUBMISSION
// ============================================================================

/// Type of content submitted for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Email,
    Sms,
    Url,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Email => "email",
            ContentKind::Sms => "sms",
            ContentKind::Url => "url",
        }
    }

    /// Type tag used in report titles and file names
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Email => "Email",
            ContentKind::Sms => "SMS",
            ContentKind::Url => "URL",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Submission {
    Email {
        #[serde(default)]
        subject: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sender_email: Option<String>,
        content: String,
    },
    Sms {
        message: String,
    },
    Url {
        url: String,
    },
}

impl Submission {
    pub fn kind(&self) -> ContentKind {
        match self {
            Submission::Email { .. } => ContentKind::Email,
            Submission::Sms { .. } => ContentKind::Sms,
            Submission::Url { .. } => ContentKind::Url,
        }
    }

    /// Short one-line preview for history listings
    pub fn preview(&self, max_chars: usize) -> String {
        let text = match self {
            Submission::Email { subject, content, .. } => {
                if subject.trim().is_empty() { content.as_str() } else { subject.as_str() }
            }
            Submission::Sms { message } => message.as_str(),
            Submission::Url { url } => url.as_str(),
        };
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() > max_chars {
            let cut: String = flat.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            flat
        }
    }
}

/// Identity printed in the report header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitterInfo {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl SubmitterInfo {
    /// Display name, falling back to the local part of the email address
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.user_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return Some(name.trim().to_string());
        }
        self.user_email
            .as_ref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .map(|local| local.to_string())
    }
}
