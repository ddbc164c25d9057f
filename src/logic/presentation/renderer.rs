use super::types::{
    DegradedNotice, IndicatorGroup, MetricRow, MetricStatus, MoreNote, Recommendation, RiskMetrics,
    VerdictBanner, ViewModel,
};
use crate::logic::analysis::{AnalysisResult, ExplanationPayload};
use crate::logic::explain::flags::{FLAG_FAMILY_SIZE, SENDER_ALERT_FLAGS};
use crate::logic::explain::{IndicatorItem, IndicatorKind, IndicatorList, URL_LENGTH_THRESHOLD};
use crate::logic::severity;

/// Max items shown for the danger and safe groups
pub const FLAG_DISPLAY_CAP: usize = 8;

/// Uppercase ratio (percent) above which the text is flagged
const UPPERCASE_CAUTION: f32 = 30.0;

const GROUP_ORDER: [IndicatorKind; 5] = [
    IndicatorKind::Danger,
    IndicatorKind::Safe,
    IndicatorKind::Keyword,
    IndicatorKind::Url,
    IndicatorKind::Info,
];

/// Build the on-screen view for one result from its full indicator list
pub fn present(result: &AnalysisResult, full_list: &IndicatorList) -> ViewModel {
    let style = severity::classify_severity(result.severity);

    let banner = VerdictBanner {
        headline: if result.is_phishing { "Phishing Detected!" } else { "Content is Safe" }.to_string(),
        subtitle: format!("{} Risk Level", style.label()),
        is_phishing: result.is_phishing,
        severity: style,
    };

    let risk = RiskMetrics {
        risk_score: result.clamped_risk(),
        confidence: result.confidence,
        confidence_label: format!("{:.2}%", result.confidence_percent()),
        bar_color: style.color,
    };

    let Some(exp) = result.explanation.as_ref() else {
        return ViewModel {
            banner,
            risk,
            groups: Vec::new(),
            notices: Vec::new(),
            metric_rows: Vec::new(),
            sender_alert: None,
            safe_urls: Vec::new(),
            recommendation: None,
        };
    };

    let mut groups = Vec::new();
    let mut notices = Vec::new();

    for kind in GROUP_ORDER {
        let items: Vec<IndicatorItem> = full_list.iter().filter(|i| i.kind == kind).cloned().collect();

        match kind {
            IndicatorKind::Danger | IndicatorKind::Safe => {
                let family = FlagFamily::for_kind(kind, result, exp);
                let family_items = items.iter().filter(|i| i.source.is_flag_family()).count();

                if let Some(family) = family.as_ref() {
                    if family_items == 0 && family.reported > 0 {
                        notices.push(family.notice(kind));
                    }
                }

                if items.is_empty() {
                    continue;
                }

                let surplus = match family.as_ref() {
                    Some(f) if family_items > 0 => f.unsampled(),
                    _ => 0,
                };
                groups.push(capped_group(kind, items, surplus, family.as_ref()));
            }
            _ => {
                if items.is_empty() {
                    continue;
                }
                groups.push(IndicatorGroup {
                    kind,
                    heading: plain_heading(kind).to_string(),
                    items,
                    more: None,
                });
            }
        }
    }

    ViewModel {
        banner,
        risk,
        groups,
        notices,
        metric_rows: metric_rows(exp),
        sender_alert: sender_alert(result, exp),
        safe_urls: exp.safe_urls.clone().unwrap_or_default(),
        recommendation: Some(recommendation(result.is_phishing)),
    }
}

// ============================================================================
// FLAG FAMILIES
// ============================================================================

/// The eligible flag family for a kind: red for phishing, green otherwise
struct FlagFamily {
    reported: u32,
    sampled: usize,
}

impl FlagFamily {
    fn for_kind(kind: IndicatorKind, result: &AnalysisResult, exp: &ExplanationPayload) -> Option<Self> {
        let (count, sample) = match kind {
            IndicatorKind::Danger if result.is_phishing => (exp.red_flag_count, exp.red_flags.as_ref()),
            IndicatorKind::Safe if !result.is_phishing => (exp.green_flag_count, exp.green_flags.as_ref()),
            _ => return None,
        };
        Some(Self {
            reported: count.unwrap_or(0),
            sampled: sample.map_or(0, |s| s.len()),
        })
    }

    /// Reported total beyond what the sample array carries
    fn unsampled(&self) -> usize {
        (self.reported as usize).saturating_sub(self.sampled)
    }

    fn notice(&self, kind: IndicatorKind) -> DegradedNotice {
        let what = if kind == IndicatorKind::Danger { "phishing" } else { "safety" };
        DegradedNotice {
            kind,
            reported: self.reported,
            message: format!(
                "{} {} indicators were reported, but details are unavailable",
                self.reported, what
            ),
        }
    }
}

fn capped_group(
    kind: IndicatorKind,
    mut items: Vec<IndicatorItem>,
    surplus: usize,
    family: Option<&FlagFamily>,
) -> IndicatorGroup {
    let overflow = items.len().saturating_sub(FLAG_DISPLAY_CAP);
    items.truncate(FLAG_DISPLAY_CAP);

    let hidden = overflow + surplus;
    let more = (hidden > 0).then(|| MoreNote {
        hidden,
        text: if kind == IndicatorKind::Danger {
            format!("+{} more warning signs", hidden)
        } else {
            format!("+{} more positive indicators", hidden)
        },
    });

    let total = family
        .map(|f| f.reported as usize)
        .filter(|&n| n > 0)
        .unwrap_or(items.len() + overflow);

    let heading = if kind == IndicatorKind::Danger {
        format!("Phishing Indicators Detected ({}/{})", total, FLAG_FAMILY_SIZE)
    } else {
        format!("Safety Indicators ({}/{})", total, FLAG_FAMILY_SIZE)
    };

    IndicatorGroup { kind, heading, items, more }
}

fn plain_heading(kind: IndicatorKind) -> &'static str {
    match kind {
        IndicatorKind::Keyword => "Suspicious Keywords Detected",
        IndicatorKind::Url => "Suspicious Links Detected",
        _ => "Additional Details",
    }
}

// ============================================================================
// DETAIL ROWS
// ============================================================================

fn metric_rows(exp: &ExplanationPayload) -> Vec<MetricRow> {
    let mut rows = Vec::new();
    let row = |label: &str, value: String, status: MetricStatus| MetricRow {
        label: label.to_string(),
        value,
        status,
    };
    let flag_status = |set: bool| if set { MetricStatus::Alert } else { MetricStatus::Ok };
    let yes_no = |set: bool| if set { "Yes" } else { "No" }.to_string();

    if let Some(n) = exp.phishing_keyword_count {
        rows.push(row("Suspicious Keywords Found", n.to_string(), flag_status(n > 0)));
    }
    if let Some(urls) = exp.suspicious_urls.as_ref().filter(|u| !u.is_empty()) {
        rows.push(row("Malicious URLs Detected", urls.len().to_string(), MetricStatus::Alert));
    }
    if let Some(ratio) = exp.uppercase_ratio {
        let status = if ratio > UPPERCASE_CAUTION { MetricStatus::Caution } else { MetricStatus::Ok };
        rows.push(row("Uppercase Text Ratio", format!("{:.1}%", ratio), status));
    }
    if let Some(len) = exp.text_length {
        rows.push(row("Content Length", format!("{} chars", len), MetricStatus::Info));
    }
    if let Some(has_ip) = exp.has_ip {
        rows.push(row("IP Address in URL", yes_no(has_ip), flag_status(has_ip)));
    }
    if let Some(tld) = exp.suspicious_tld {
        rows.push(row("Suspicious Domain", yes_no(tld), flag_status(tld)));
    }
    if let Some(len) = exp.url_length {
        let status = if len > URL_LENGTH_THRESHOLD { MetricStatus::Caution } else { MetricStatus::Ok };
        rows.push(row("URL Length", format!("{} chars", len), status));
    }
    if let Some(https) = exp.https {
        let value = if https { "Enabled" } else { "Disabled" }.to_string();
        rows.push(row("HTTPS Encryption", value, flag_status(!https)));
    }

    rows
}

fn sender_alert(result: &AnalysisResult, exp: &ExplanationPayload) -> Option<String> {
    if !result.is_phishing {
        return None;
    }
    let summary = exp.red_flags_summary.as_ref()?;
    let labels: Vec<&str> = SENDER_ALERT_FLAGS
        .iter()
        .filter(|(key, _)| summary.get(*key).map_or(false, |v| v.is_set()))
        .map(|(_, label)| *label)
        .collect();

    (!labels.is_empty()).then(|| labels.join(", "))
}

pub fn recommendation(is_phishing: bool) -> Recommendation {
    if is_phishing {
        Recommendation {
            title: "Recommendation".to_string(),
            text: "This content shows signs of phishing. Do not click any links, provide personal \
                   information, or respond. Delete it immediately and report if possible."
                .to_string(),
        }
    } else {
        Recommendation {
            title: "Safety Check".to_string(),
            text: "This content appears to be legitimate. However, always verify sender identity \
                   and be cautious with sensitive information."
                .to_string(),
        }
    }
}
