use chrono::{Local, TimeZone};

use super::*;
use crate::logic::analysis::{ContentKind, ExplanationPayload, Submission, SubmitterInfo};
use crate::logic::explain::{aggregate, IndicatorKind, IndicatorSource};
use crate::logic::fixtures::{email_submission, numbered, result, strings, submitter, url_scenario};
use crate::logic::palette;

fn small_geometry() -> PageGeometry {
    PageGeometry {
        width: 10.0,
        height: 12.0,
        header_height: 1.0,
        capacity: 10.0,
        margin: 1.0,
    }
}

fn text(s: &str) -> BlockContent {
    BlockContent::Banner { text: s.to_string(), color: palette::NEUTRAL }
}

fn footer() -> FooterText {
    FooterText { left: "left".into(), center: "center".into() }
}

fn page_labels(doc: &ReportDocument) -> Vec<String> {
    doc.footers()
        .filter_map(|b| match &b.content {
            BlockContent::Footer { page_label, .. } => Some(page_label.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_twenty_three_rows_span_three_pages() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    pages.place(BlockRole::Banner, 1.0, text("banner"));
    pages.place(BlockRole::Card, 1.0, text("card"));
    pages.place(BlockRole::Table, 1.0, text("table"));
    for i in 0..23 {
        pages.place(BlockRole::Table, 1.0, text(&format!("row {}", i)));
    }
    let doc = pages.finish(ContentKind::Email, "t".into(), footer());

    assert_eq!(doc.page_count, 3);
    assert_eq!(page_labels(&doc), vec!["Page 1 of 3", "Page 2 of 3", "Page 3 of 3"]);

    let rows_on = |page| doc.blocks_on(page).filter(|b| b.role == BlockRole::Table).count();
    // table block plus 6 rows, then 9, then 8
    assert_eq!(rows_on(1), 7);
    assert_eq!(rows_on(2), 9);
    assert_eq!(rows_on(3), 8);

    let headers = doc.blocks.iter().filter(|b| b.role == BlockRole::Header).count();
    assert_eq!(headers, 3);
}

#[test]
fn test_cursor_never_exceeds_capacity() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    for _ in 0..40 {
        pages.place(BlockRole::Table, 0.7, text("row"));
        assert!(pages.cursor().offset <= pages.cursor().capacity);
    }
    let doc = pages.finish(ContentKind::Sms, "t".into(), footer());
    assert!(doc
        .blocks
        .iter()
        .filter(|b| b.role != BlockRole::Footer)
        .all(|b| b.y + b.height <= 10.0 + f32::EPSILON));
}

#[test]
fn test_oversized_block_placed_alone() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    pages.place(BlockRole::Banner, 2.0, text("banner"));
    let big = pages.place(BlockRole::Table, 25.0, text("big")).expect("placed");
    assert_eq!(big.page, 2);
    assert_eq!(big.y, 1.0);
    assert_eq!(pages.cursor().offset, 10.0);

    let next = pages.place(BlockRole::Text, 1.0, text("after")).expect("placed");
    assert_eq!(next.page, 3);

    let doc = pages.finish(ContentKind::Url, "t".into(), footer());
    assert_eq!(doc.page_count, 3);
}

#[test]
fn test_oversized_first_block_does_not_open_blank_page() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    let big = pages.place(BlockRole::Table, 50.0, text("big")).expect("placed");
    assert_eq!(big.page, 1);
}

#[test]
fn test_done_refuses_more_blocks() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    pages.place(BlockRole::Banner, 1.0, text("banner"));
    let doc = pages.finish(ContentKind::Email, "t".into(), footer());
    assert_eq!(pages.state(), PaginatorState::Done);
    assert!(pages.place(BlockRole::Text, 1.0, text("late")).is_none());
    assert_eq!(doc.page_count, 1);
}

#[test]
fn test_non_finite_height_treated_as_zero() {
    let mut pages = Paginator::new(small_geometry(), text("header"));
    pages.place(BlockRole::Text, f32::NAN, text("nan"));
    assert_eq!(pages.cursor().offset, 1.0);
}

fn at() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single().expect("valid time")
}

#[test]
fn test_email_report_block_order() {
    let exp = ExplanationPayload {
        red_flags: Some(strings(&["a", "b", "c"])),
        red_flag_count: Some(5),
        keywords_found: Some(strings(&["verify"])),
        ..Default::default()
    };
    let r = result(true, Some(exp));
    let list = aggregate(&r);
    let doc = layout_with(&r, &list, &email_submission(), &submitter(), PageGeometry::a4(), at());

    assert_eq!(doc.title, "Email Analysis Report");
    assert_eq!(doc.page_count, 1);

    let roles: Vec<BlockRole> = doc.blocks.iter().map(|b| b.role).collect();
    assert_eq!(roles[0], BlockRole::Header);
    assert_eq!(roles[1], BlockRole::Banner);
    assert_eq!(roles[2], BlockRole::Card);
    assert_eq!(roles[3], BlockRole::Table);
    assert_eq!(roles[4], BlockRole::Text);
    assert_eq!(*roles.last().expect("footer"), BlockRole::Footer);

    match &doc.blocks[1].content {
        BlockContent::Banner { text, color } => {
            assert_eq!(text, "WARNING: PHISHING DETECTED");
            assert_eq!(*color, palette::WARNING);
        }
        other => panic!("unexpected block {:?}", other),
    }

    match &doc.blocks[0].content {
        BlockContent::Header { meta, theme, .. } => {
            assert_eq!(meta[0], "User: Snehil");
            assert_eq!(meta[2], "Generated: 2025-03-14 09:30:00");
            assert_eq!(*theme, palette::theme(ContentKind::Email));
        }
        other => panic!("unexpected block {:?}", other),
    }

    // exactly the three sampled danger rows, no "+N more" in the document
    let danger_rows = doc
        .indicator_rows()
        .filter(|b| matches!(b.content, BlockContent::IndicatorRow { kind: IndicatorKind::Danger, .. }))
        .count();
    assert_eq!(danger_rows, 3);
    assert_eq!(doc.indicator_rows().count(), 4);
}

#[test]
fn test_document_keeps_every_indicator() {
    let exp = ExplanationPayload {
        red_flags: Some(numbered("Flag", 60)),
        red_flag_count: Some(60),
        ..Default::default()
    };
    let r = result(true, Some(exp));
    let list = aggregate(&r);
    let doc = layout_with(&r, &list, &email_submission(), &submitter(), PageGeometry::a4(), at());

    assert_eq!(doc.indicator_rows().count(), 60);
    assert!(doc.page_count >= 2);
    assert_eq!(page_labels(&doc).len(), doc.page_count);
    assert!(doc
        .blocks
        .iter()
        .filter(|b| b.role != BlockRole::Footer)
        .all(|b| b.y + b.height <= doc.geometry.capacity + 0.001));

    let indices: Vec<usize> = doc
        .indicator_rows()
        .filter_map(|b| match b.content {
            BlockContent::IndicatorRow { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, (1..=60).collect::<Vec<_>>());
}

#[test]
fn test_url_report_has_technical_table() {
    let r = url_scenario();
    let list = aggregate(&r);
    let submission = Submission::Url { url: "http://192.168.1.1/login.tk".into() };
    let doc = layout_with(&r, &list, &submission, &SubmitterInfo::default(), PageGeometry::a4(), at());

    let tables: Vec<&String> = doc
        .blocks
        .iter()
        .filter_map(|b| match &b.content {
            BlockContent::Table { title, .. } => Some(title),
            _ => None,
        })
        .collect();
    assert_eq!(tables, vec!["URL Details", "Technical Analysis"]);

    let tech = doc.blocks.iter().find_map(|b| match &b.content {
        BlockContent::Table { title, rows, .. } if title == "Technical Analysis" => Some(rows),
        _ => None,
    });
    let rows = tech.expect("technical table");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].cells[2], vec!["Suspicious".to_string()]);

    let colors: Vec<_> = doc
        .indicator_rows()
        .filter_map(|b| match &b.content {
            BlockContent::IndicatorRow { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 5);
    assert!(colors.iter().all(|c| *c == palette::WARNING));
}

#[test]
fn test_safe_sms_without_explanation() {
    let r = result(false, None);
    let list = aggregate(&r);
    let submission = Submission::Sms { message: "See you at 6".into() };
    let doc = layout(&r, &list, &submission, &SubmitterInfo::default());

    assert_eq!(doc.page_count, 1);
    assert_eq!(doc.indicator_rows().count(), 0);
    assert!(doc.blocks.iter().any(|b| matches!(
        &b.content,
        BlockContent::Banner { text, .. } if text == "SAFE MESSAGE"
    )));
    assert!(doc.blocks.iter().any(|b| matches!(
        &b.content,
        BlockContent::SectionTitle { subtitle, .. } if subtitle == "Total Indicators Found: 0"
    )));
}

#[test]
fn test_email_body_truncated_in_details() {
    let r = result(false, None);
    let submission = Submission::Email {
        subject: "Hi".into(),
        sender_email: None,
        content: "x".repeat(400),
    };
    let doc = layout_with(&r, &Vec::new(), &submission, &submitter(), PageGeometry::a4(), at());

    let rows = doc
        .blocks
        .iter()
        .find_map(|b| match &b.content {
            BlockContent::Table { rows, .. } => Some(rows),
            _ => None,
        })
        .expect("detail table");
    assert_eq!(rows[1].cells[1], vec!["N/A".to_string()]);
    let body: String = rows[2].cells[1].concat();
    assert_eq!(body.chars().count(), 303);
    assert!(body.ends_with("..."));
}

fn assert_blocks_fit(doc: &ReportDocument) {
    for block in doc.blocks.iter().filter(|b| b.role != BlockRole::Footer) {
        assert!(
            block.y + block.height <= doc.geometry.capacity + 1e-3,
            "{:?} on page {} runs to {}",
            block.role,
            block.page,
            block.y + block.height
        );
    }
}

#[test]
fn test_long_sms_stays_on_page() {
    let r = result(true, None);
    let submission = Submission::Sms { message: "parcel held ".repeat(1_250) };
    let doc = layout_with(&r, &Vec::new(), &submission, &submitter(), PageGeometry::a4(), at());

    assert_blocks_fit(&doc);
    let message = doc
        .blocks
        .iter()
        .find_map(|b| match &b.content {
            BlockContent::Table { rows, .. } => Some(rows[0].cells[1].concat()),
            _ => None,
        })
        .expect("detail table");
    assert!(message.ends_with("..."));
}

#[test]
fn test_long_url_and_link_indicator_stay_on_page() {
    let url = format!("http://login.example.tk/{}", "a".repeat(20_000));
    let r = result(
        true,
        Some(ExplanationPayload {
            suspicious_urls: Some(vec![crate::logic::analysis::SuspiciousUrl { url: url.clone(), risk: 95 }]),
            url_length: Some(20_024),
            ..Default::default()
        }),
    );
    let list = aggregate(&r);
    let doc = layout_with(&r, &list, &Submission::Url { url }, &submitter(), PageGeometry::a4(), at());

    assert_blocks_fit(&doc);
    assert_eq!(doc.indicator_rows().count(), list.len());
    let longest = doc
        .indicator_rows()
        .filter_map(|b| match &b.content {
            BlockContent::IndicatorRow { text, .. } => Some(text.chars().count()),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    assert_eq!(longest, layout::INDICATOR_TEXT_CHARS + 3);
}

#[test]
fn test_urgency_details_in_row_text() {
    let mut summary = std::collections::BTreeMap::new();
    summary.insert(
        "urgency_phrases".to_string(),
        crate::logic::analysis::FlagValue::Phrases(strings(&["act now"])),
    );
    let r = result(
        true,
        Some(ExplanationPayload { red_flags_summary: Some(summary), ..Default::default() }),
    );
    let list = aggregate(&r);
    assert_eq!(list[0].source, IndicatorSource::FlagSummary);

    let doc = layout_with(&r, &list, &email_submission(), &submitter(), PageGeometry::a4(), at());
    let row = doc.indicator_rows().next().expect("row");
    match &row.content {
        BlockContent::IndicatorRow { text, tag, .. } => {
            assert!(text.ends_with("(act now)"));
            assert_eq!(tag, "CONTENT");
        }
        other => panic!("unexpected block {:?}", other),
    }
}
