//! Text rendering of command results for the terminal.

use std::fmt::Write;

use crate::api::commands::{AnalysisOutcome, HistoryEntry};
use crate::logic::history::ScanStats;
use crate::logic::presentation::{MetricStatus, ViewModel};
use crate::logic::service::HealthResponse;

const RULE: &str = "------------------------------------------------------------";

pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    let mut out = render_view(&outcome.view);
    if let Some(id) = &outcome.record_id {
        let _ = writeln!(out, "Saved as {}", id);
    }
    out
}

pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    let banner = &view.banner;

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}  [{}]", banner.headline, banner.subtitle);
    let _ = writeln!(
        out,
        "Risk score: {}/100   Confidence: {}",
        view.risk.risk_score, view.risk.confidence_label
    );
    let _ = writeln!(out, "{}", RULE);

    if let Some(alert) = &view.sender_alert {
        let _ = writeln!(out, "Sender alert: {}", alert);
    }

    for group in &view.groups {
        let _ = writeln!(out, "\n{}", group.heading);
        for item in &group.items {
            let _ = writeln!(out, "  [{}] {}", item.kind.icon(), item.full_text());
        }
        if let Some(more) = &group.more {
            let _ = writeln!(out, "  {}", more.text);
        }
    }

    for notice in &view.notices {
        let _ = writeln!(out, "\n! {}", notice.message);
    }

    if !view.metric_rows.is_empty() {
        let _ = writeln!(out, "\nDetails");
        for row in &view.metric_rows {
            let mark = match row.status {
                MetricStatus::Alert => "!!",
                MetricStatus::Caution => "! ",
                MetricStatus::Ok => "ok",
                MetricStatus::Info => "  ",
            };
            let _ = writeln!(out, "  {} {:<28} {}", mark, row.label, row.value);
        }
    }

    if !view.safe_urls.is_empty() {
        let _ = writeln!(out, "\nSafe links");
        for url in &view.safe_urls {
            let _ = writeln!(out, "  {}", url);
        }
    }

    if let Some(rec) = &view.recommendation {
        let _ = writeln!(out, "\n{}: {}", rec.title, rec.text);
    }
    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No scans yet.\n".to_string();
    }
    let mut out = String::new();
    for e in entries {
        let verdict = if e.is_phishing { "PHISHING" } else { "SAFE" };
        let _ = writeln!(
            out,
            "{}  {}  {:<5} {:<8} {:>3}  {}",
            e.id,
            e.created_at.format("%Y-%m-%d %H:%M"),
            e.kind.label(),
            verdict,
            e.risk_score,
            e.preview
        );
    }
    out
}

pub fn render_stats(stats: &ScanStats) -> String {
    format!(
        "Total scans:      {}\nThreats detected: {}\nSafe content:     {}\nScans today:      {}\n",
        stats.total_scans, stats.threats_detected, stats.safe_content, stats.today_scans
    )
}

pub fn render_health(health: &HealthResponse) -> String {
    let mut out = format!("Service status: {}", health.status);
    if let Some(loaded) = health.model_loaded {
        let _ = write!(out, " (model loaded: {})", loaded);
    }
    if let Some(version) = &health.version {
        let _ = write!(out, " v{}", version);
    }
    out.push('\n');
    out
}
