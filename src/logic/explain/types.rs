use serde::Serialize;

use crate::logic::palette::{self, Rgb};

/// Normalized indicator category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Danger,
    Safe,
    Keyword,
    Url,
    Info,
}

impl IndicatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Danger => "DANGER",
            IndicatorKind::Safe => "SAFE",
            IndicatorKind::Keyword => "KEYWORD",
            IndicatorKind::Url => "URL",
            IndicatorKind::Info => "INFO",
        }
    }

    /// ASCII glyph; the report fonts carry no symbol set
    pub fn icon(&self) -> &'static str {
        match self {
            IndicatorKind::Danger | IndicatorKind::Url => "X",
            IndicatorKind::Safe => "OK",
            IndicatorKind::Keyword => "!",
            IndicatorKind::Info => "i",
        }
    }

    /// Row color, independent of the result's severity
    pub fn color(&self) -> Rgb {
        match self {
            IndicatorKind::Danger | IndicatorKind::Url => palette::WARNING,
            IndicatorKind::Safe => palette::SUCCESS,
            IndicatorKind::Keyword => palette::ACCENT,
            IndicatorKind::Info => palette::NEUTRAL,
        }
    }
}

/// Payload field an indicator was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    FlagSummary,
    RedFlags,
    GreenFlags,
    Keywords,
    SuspiciousUrls,
    Metric,
}

impl IndicatorSource {
    /// True for the two flag families (named map and free-text arrays)
    pub fn is_flag_family(&self) -> bool {
        matches!(
            self,
            IndicatorSource::FlagSummary | IndicatorSource::RedFlags | IndicatorSource::GreenFlags
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorItem {
    pub kind: IndicatorKind,
    pub text: String,
    /// Short type label for table rendering
    pub tag: String,
    /// Sub-detail lines (matched phrases)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    pub source: IndicatorSource,
}

impl IndicatorItem {
    pub fn new(kind: IndicatorKind, text: impl Into<String>, source: IndicatorSource) -> Self {
        Self {
            kind,
            text: text.into(),
            tag: kind.label().to_string(),
            details: Vec::new(),
            source,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Text plus sub-detail, as printed in the report table
    pub fn full_text(&self) -> String {
        if self.details.is_empty() {
            self.text.clone()
        } else {
            format!("{} ({})", self.text, self.details.join(", "))
        }
    }
}

/// Ordered, deduplicated indicator sequence
pub type IndicatorList = Vec<IndicatorItem>;
