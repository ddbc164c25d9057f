use serde::Serialize;

use crate::logic::explain::{IndicatorItem, IndicatorKind};
use crate::logic::palette::Rgb;
use crate::logic::severity::SeverityStyle;

/// Everything the display layer needs for one result
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub banner: VerdictBanner,
    pub risk: RiskMetrics,
    /// Indicator groups in display order; empty groups are omitted
    pub groups: Vec<IndicatorGroup>,
    /// Reported counts with no detail to show
    pub notices: Vec<DegradedNotice>,
    pub metric_rows: Vec<MetricRow>,
    pub sender_alert: Option<String>,
    pub safe_urls: Vec<String>,
    pub recommendation: Option<Recommendation>,
}

impl ViewModel {
    pub fn group(&self, kind: IndicatorKind) -> Option<&IndicatorGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerdictBanner {
    pub headline: String,
    pub subtitle: String,
    pub is_phishing: bool,
    pub severity: SeverityStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskMetrics {
    pub risk_score: i32,
    pub confidence: f32,
    /// e.g. "87.00%"
    pub confidence_label: String,
    pub bar_color: Rgb,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorGroup {
    pub kind: IndicatorKind,
    pub heading: String,
    pub items: Vec<IndicatorItem>,
    pub more: Option<MoreNote>,
}

/// "+N more" trailer under a capped group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoreNote {
    pub hidden: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedNotice {
    pub kind: IndicatorKind,
    pub reported: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Alert,
    Caution,
    Ok,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub text: String,
}
