//! Severity Classifier
//!
//! Maps a severity label to a display tier. Total over all strings:
//! missing or unmapped labels land in the `Unknown` tier.

use serde::Serialize;

use super::analysis::Severity;
use super::palette::{self, Rgb};

/// Display tier; same buckets as `Severity`
pub type SeverityTier = Severity;

/// Icon shown next to the severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityIcon {
    AlertTriangle,
    AlertCircle,
    CheckCircle,
    Info,
}

/// Presentation attributes for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    pub tier: SeverityTier,
    /// Ordering weight; higher is more severe
    pub color_weight: u8,
    pub color: Rgb,
    pub icon: SeverityIcon,
}

impl SeverityStyle {
    /// "Critical", "High", ... for headings
    pub fn label(&self) -> String {
        let s = self.tier.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Classify a raw severity label (case-insensitive)
pub fn classify(severity: Option<&str>) -> SeverityStyle {
    classify_severity(severity.map(Severity::parse).unwrap_or_default())
}

/// Classify an already-parsed severity
pub fn classify_severity(severity: Severity) -> SeverityStyle {
    let (color_weight, color, icon) = match severity {
        Severity::Critical => (4, palette::WARNING, SeverityIcon::AlertTriangle),
        Severity::High => (3, palette::ORANGE, SeverityIcon::AlertCircle),
        Severity::Medium => (2, palette::YELLOW, SeverityIcon::AlertCircle),
        Severity::Low => (1, palette::SUCCESS, SeverityIcon::CheckCircle),
        Severity::Unknown => (0, palette::NEUTRAL, SeverityIcon::Info),
    };

    SeverityStyle {
        tier: severity,
        color_weight,
        color,
        icon,
    }
}
