use std::collections::HashSet;

use super::flags::{self, URGENCY_FLAG_KEY, URGENCY_PHRASES_KEY};
use super::types::{IndicatorItem, IndicatorKind, IndicatorList, IndicatorSource};
use crate::logic::analysis::{AnalysisResult, ExplanationPayload};

/// URL length above which the length itself counts as a danger signal
pub const URL_LENGTH_THRESHOLD: u32 = 75;

/// Aggregate one result into its ordered, deduplicated indicator list.
///
/// Source order: flags summary, sampled red/green flags, keywords,
/// suspicious URLs, scalar metrics. Never re-sorted.
pub fn aggregate(result: &AnalysisResult) -> IndicatorList {
    let Some(exp) = result.explanation.as_ref() else {
        return Vec::new();
    };

    let mut items = Vec::new();

    if result.is_phishing {
        summary_flags(exp, &mut items);

        for flag in exp.red_flags.iter().flatten() {
            items.push(IndicatorItem::new(IndicatorKind::Danger, flag.trim(), IndicatorSource::RedFlags));
        }
    } else {
        for flag in exp.green_flags.iter().flatten() {
            items.push(IndicatorItem::new(IndicatorKind::Safe, flag.trim(), IndicatorSource::GreenFlags));
        }
    }

    for keyword in exp.keywords_found.iter().flatten() {
        items.push(IndicatorItem::new(
            IndicatorKind::Keyword,
            format!("Suspicious keyword: \"{}\"", keyword.trim()),
            IndicatorSource::Keywords,
        ));
    }

    for link in exp.suspicious_urls.iter().flatten() {
        items.push(IndicatorItem::new(
            IndicatorKind::Url,
            format!("Malicious link: {} (Risk: {}%)", link.url.trim(), link.risk),
            IndicatorSource::SuspiciousUrls,
        ));
    }

    scalar_metrics(exp, &mut items);

    dedup(items)
}

fn summary_flags(exp: &ExplanationPayload, items: &mut IndicatorList) {
    let Some(summary) = exp.red_flags_summary.as_ref() else {
        return;
    };

    let phrases: Vec<String> = summary
        .get(URGENCY_PHRASES_KEY)
        .map(|v| {
            v.phrases()
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    for entry in flags::EMAIL_RED_FLAGS.iter() {
        let set = summary.get(entry.key).map_or(false, |v| v.is_set());
        let is_urgency = entry.key == URGENCY_FLAG_KEY;

        if !(set || (is_urgency && !phrases.is_empty())) {
            continue;
        }

        let mut item = IndicatorItem::new(IndicatorKind::Danger, entry.description, IndicatorSource::FlagSummary)
            .with_tag(entry.category.tag());
        if is_urgency {
            item = item.with_details(phrases.clone());
        }
        items.push(item);
    }
}

fn scalar_metrics(exp: &ExplanationPayload, items: &mut IndicatorList) {
    if exp.has_ip == Some(true) {
        items.push(IndicatorItem::new(
            IndicatorKind::Danger,
            "URL contains IP address instead of domain name",
            IndicatorSource::Metric,
        ));
    }

    if exp.suspicious_tld == Some(true) {
        items.push(IndicatorItem::new(
            IndicatorKind::Danger,
            "Suspicious top-level domain detected",
            IndicatorSource::Metric,
        ));
    }

    if let Some(length) = exp.url_length {
        let item = if length > URL_LENGTH_THRESHOLD {
            IndicatorItem::new(
                IndicatorKind::Danger,
                format!("URL length: {} characters (Suspicious)", length),
                IndicatorSource::Metric,
            )
        } else {
            IndicatorItem::new(
                IndicatorKind::Info,
                format!("URL length: {} characters", length),
                IndicatorSource::Metric,
            )
        };
        items.push(item);
    }

    if exp.https == Some(false) {
        items.push(IndicatorItem::new(
            IndicatorKind::Danger,
            "No HTTPS encryption detected",
            IndicatorSource::Metric,
        ));
    }
}

/// Dedup key: whitespace-collapsed, case-folded text
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Drop later items whose `(kind, text)` was already seen; empty texts are dropped too
fn dedup(items: IndicatorList) -> IndicatorList {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = normalize_text(&item.text);
            !key.is_empty() && seen.insert((item.kind, key))
        })
        .collect()
}
