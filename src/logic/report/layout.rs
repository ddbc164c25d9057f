use chrono::{DateTime, Local};

use super::paginator::{FooterText, Paginator};
use super::text::{self, chars_per_line, line_height, wrap};
use super::types::{BlockContent, BlockRole, PageGeometry, ReportDocument, TableRow};
use crate::logic::analysis::{AnalysisResult, ContentKind, ExplanationPayload, Submission, SubmitterInfo};
use crate::logic::explain::{IndicatorList, URL_LENGTH_THRESHOLD};
use crate::logic::palette::{self, Rgb};
use crate::logic::severity;

// ============================================================================
// METRICS
// ============================================================================

pub const BLOCK_GAP: f32 = 10.0;
pub const BANNER_HEIGHT: f32 = 22.0;
pub const CARD_HEIGHT: f32 = 28.0;

pub const BODY_PT: f32 = 9.0;
pub const NOTE_PT: f32 = 10.0;

pub const TITLE_ROW: f32 = 8.0;
pub const HEAD_ROW: f32 = 8.0;
pub const SUBTITLE_ROW: f32 = 6.0;
pub const CELL_PADDING: f32 = 2.0;
pub const ROW_PADDING: f32 = 4.0;

/// Submitted text is cut to this many characters in the detail table
pub const BODY_PREVIEW_CHARS: usize = 300;

/// Longest indicator text kept in a single row
pub const INDICATOR_TEXT_CHARS: usize = 1_000;

const DETAIL_COLUMNS: [f32; 2] = [0.3, 0.7];
const TECH_COLUMNS: [f32; 3] = [0.4, 0.35, 0.25];
pub const INDICATOR_COLUMNS: [f32; 3] = [0.08, 0.17, 0.75];

// ============================================================================
// LAYOUT
// ============================================================================

/// Lay out the full report on A4, stamped with the current local time
pub fn layout(
    result: &AnalysisResult,
    full_list: &IndicatorList,
    submission: &Submission,
    submitter: &SubmitterInfo,
) -> ReportDocument {
    layout_with(result, full_list, submission, submitter, PageGeometry::a4(), Local::now())
}

pub fn layout_with(
    result: &AnalysisResult,
    full_list: &IndicatorList,
    submission: &Submission,
    submitter: &SubmitterInfo,
    geometry: PageGeometry,
    generated_at: DateTime<Local>,
) -> ReportDocument {
    let kind = submission.kind();
    let theme = palette::theme(kind);
    let title = format!("{} Analysis Report", kind.label());
    let width = geometry.content_width();

    let mut pages = Paginator::new(geometry, header(&title, submitter, generated_at, theme));

    // Verdict banner
    pages.place(
        BlockRole::Banner,
        BANNER_HEIGHT + BLOCK_GAP,
        BlockContent::Banner {
            text: banner_text(kind, result.is_phishing).to_string(),
            color: palette::verdict(result.is_phishing),
        },
    );

    // Risk card
    let style = severity::classify_severity(result.severity);
    let risk = result.clamped_risk();
    pages.place(
        BlockRole::Card,
        CARD_HEIGHT + BLOCK_GAP,
        BlockContent::RiskCard {
            risk_score: risk,
            confidence_label: format!("{:.2}%", result.confidence_percent()),
            severity_label: style.label(),
            bar_fraction: risk as f32 / 100.0,
            bar_color: style.color,
        },
    );

    // Submitted content
    place_table(
        &mut pages,
        format!("{} Details", kind.label()),
        &["Field", "Value"],
        &DETAIL_COLUMNS,
        detail_rows(submission),
        theme,
        width,
    );

    if kind == ContentKind::Url {
        let rows = result.explanation.as_ref().map(technical_rows).unwrap_or_default();
        if !rows.is_empty() {
            place_table(
                &mut pages,
                "Technical Analysis".to_string(),
                &["Metric", "Value", "Status"],
                &TECH_COLUMNS,
                rows,
                theme,
                width,
            );
        }
    }

    // One row per indicator
    pages.place(
        BlockRole::Text,
        TITLE_ROW + SUBTITLE_ROW + HEAD_ROW,
        BlockContent::SectionTitle {
            title: "Complete Indicators Analysis".to_string(),
            subtitle: format!("Total Indicators Found: {}", full_list.len()),
            head: vec![String::new(), "Type".to_string(), "Indicator Detail".to_string()],
            theme,
        },
    );

    let detail_chars = cell_chars(width, INDICATOR_COLUMNS[2], BODY_PT);
    for (i, item) in full_list.iter().enumerate() {
        let text = text::truncate(&item.full_text(), INDICATOR_TEXT_CHARS);
        let lines = wrap(&text, detail_chars);
        let height = lines.len() as f32 * line_height(BODY_PT) + ROW_PADDING;
        pages.place(
            BlockRole::Table,
            height,
            BlockContent::IndicatorRow {
                index: i + 1,
                kind: item.kind,
                tag: item.tag.clone(),
                text,
                lines,
                color: item.kind.color(),
                striped: i % 2 == 1,
            },
        );
    }

    // Recommendation
    let note_lines = wrap(
        recommendation_text(kind, result.is_phishing),
        chars_per_line(width - 2.0 * CELL_PADDING - 6.0, NOTE_PT),
    );
    let note_height = TITLE_ROW + note_lines.len() as f32 * line_height(NOTE_PT) + ROW_PADDING * 2.0;
    pages.place(
        BlockRole::Card,
        BLOCK_GAP + note_height,
        BlockContent::Note {
            title: "Security Recommendation".to_string(),
            lines: note_lines,
            fill: palette::RECOMMENDATION_FILL,
        },
    );

    pages.finish(
        kind,
        title.clone(),
        FooterText {
            left: "PhishGuard - Your Security Partner".to_string(),
            center: title,
        },
    )
}

// ============================================================================
// SECTIONS
// ============================================================================

fn header(title: &str, submitter: &SubmitterInfo, at: DateTime<Local>, theme: Rgb) -> BlockContent {
    let mut meta = Vec::new();
    if let Some(name) = submitter.display_name() {
        meta.push(format!("User: {}", name));
    }
    if let Some(email) = submitter.user_email.as_deref().filter(|e| !e.trim().is_empty()) {
        meta.push(email.to_string());
    }
    meta.push(format!("Generated: {}", at.format("%Y-%m-%d %H:%M:%S")));

    BlockContent::Header {
        title: title.to_string(),
        subtitle: "Advanced Phishing Detection & Analysis".to_string(),
        meta,
        theme,
        logo: "PG".to_string(),
    }
}

pub fn banner_text(kind: ContentKind, is_phishing: bool) -> &'static str {
    match (kind, is_phishing) {
        (ContentKind::Email, true) => "WARNING: PHISHING DETECTED",
        (ContentKind::Email, false) => "SAFE CONTENT",
        (ContentKind::Sms, true) => "WARNING: SMISHING DETECTED",
        (ContentKind::Sms, false) => "SAFE MESSAGE",
        (ContentKind::Url, true) => "WARNING: MALICIOUS URL DETECTED",
        (ContentKind::Url, false) => "SAFE URL",
    }
}

pub fn recommendation_text(kind: ContentKind, is_phishing: bool) -> &'static str {
    match (kind, is_phishing) {
        (ContentKind::Email, true) => {
            "This content shows strong signs of phishing. Do NOT click any links, provide personal \
             information, or respond to this email. Delete it immediately and report it to your IT \
             security team if applicable."
        }
        (ContentKind::Email, false) => {
            "This content appears to be legitimate. However, always verify sender identity through \
             alternative channels before sharing sensitive information or clicking links."
        }
        (ContentKind::Sms, true) => {
            "This SMS shows strong signs of smishing (SMS phishing). Do NOT click any links, provide \
             personal information, or respond to this message. Delete it immediately and report to \
             your mobile carrier if possible."
        }
        (ContentKind::Sms, false) => {
            "This SMS appears to be legitimate. However, always verify sender identity through \
             official channels before clicking links or sharing sensitive information."
        }
        (ContentKind::Url, true) => {
            "This URL shows strong signs of being malicious or a phishing site. Do NOT click this \
             link or enter any personal information. Avoid visiting this website and report it if \
             you received it via email or SMS."
        }
        (ContentKind::Url, false) => {
            "This URL appears to be safe. However, always verify the domain matches the expected \
             website and use caution when entering sensitive information online."
        }
    }
}

fn preview(value: &str) -> String {
    text::truncate(value, BODY_PREVIEW_CHARS)
}

fn detail_rows(submission: &Submission) -> Vec<Vec<String>> {
    match submission {
        Submission::Email { subject, sender_email, content } => vec![
            vec!["Subject".to_string(), preview(subject)],
            vec![
                "Sender Email".to_string(),
                sender_email.as_deref().map(preview).unwrap_or_else(|| "N/A".to_string()),
            ],
            vec!["Email Body".to_string(), preview(content)],
        ],
        Submission::Sms { message } => vec![vec!["Message Content".to_string(), preview(message)]],
        Submission::Url { url } => vec![vec!["Analyzed URL".to_string(), preview(url)]],
    }
}

/// Metric rows for URL reports; absent metrics are left out
fn technical_rows(exp: &ExplanationPayload) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let warn = |set: bool| if set { "Warning" } else { "OK" }.to_string();

    if let Some(len) = exp.url_length {
        let status = if len > URL_LENGTH_THRESHOLD { "Suspicious" } else { "Normal" };
        rows.push(vec!["URL Length".to_string(), format!("{} chars", len), status.to_string()]);
    }
    if let Some(has_ip) = exp.has_ip {
        let value = if has_ip { "Yes" } else { "No" };
        rows.push(vec!["IP Address".to_string(), value.to_string(), warn(has_ip)]);
    }
    if let Some(tld) = exp.suspicious_tld {
        let value = if tld { "Suspicious TLD" } else { "Standard TLD" };
        rows.push(vec!["Domain Type".to_string(), value.to_string(), warn(tld)]);
    }
    if let Some(https) = exp.https {
        let value = if https { "Enabled" } else { "Disabled" };
        rows.push(vec!["HTTPS Encryption".to_string(), value.to_string(), warn(!https)]);
    }
    rows
}

fn cell_chars(width: f32, fraction: f32, font_pt: f32) -> usize {
    chars_per_line(width * fraction - 2.0 * CELL_PADDING, font_pt)
}

fn place_table(
    pages: &mut Paginator,
    title: String,
    head: &[&str],
    columns: &[f32],
    rows: Vec<Vec<String>>,
    theme: Rgb,
    width: f32,
) {
    let rows: Vec<TableRow> = rows
        .into_iter()
        .map(|cells| TableRow {
            cells: cells
                .iter()
                .zip(columns)
                .map(|(cell, fraction)| wrap(cell, cell_chars(width, *fraction, BODY_PT)))
                .collect(),
        })
        .collect();

    let body: f32 = rows
        .iter()
        .map(|r| r.line_count() as f32 * line_height(BODY_PT) + ROW_PADDING)
        .sum();

    pages.place(
        BlockRole::Table,
        TITLE_ROW + HEAD_ROW + body + BLOCK_GAP,
        BlockContent::Table {
            title,
            head: head.iter().map(|h| h.to_string()).collect(),
            rows,
            columns: columns.to_vec(),
            theme,
        },
    );
}
