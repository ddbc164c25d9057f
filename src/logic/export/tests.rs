use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use super::encoder::latin1;
use super::*;
use crate::logic::analysis::{ContentKind, ExplanationPayload, Submission, SubmitterInfo};
use crate::logic::explain::aggregate;
use crate::logic::fixtures::{email_submission, numbered, result, submitter, url_scenario};
use crate::logic::report::{layout, ReportDocument};

fn email_doc(flags: usize) -> ReportDocument {
    let r = result(
        true,
        Some(ExplanationPayload {
            red_flags: Some(numbered("Suspicious sign", flags)),
            red_flag_count: Some(flags as u32),
            ..Default::default()
        }),
    );
    layout(&r, &aggregate(&r), &email_submission(), &submitter())
}

#[test]
fn test_encode_produces_one_pdf_page_per_document_page() {
    let doc = email_doc(80);
    assert!(doc.page_count > 1);

    let bytes = encode(&doc).expect("encode");
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let parsed = lopdf::Document::load_mem(&bytes).expect("parse back");
    assert_eq!(parsed.get_pages().len(), doc.page_count);
}

#[test]
fn test_encode_url_report() {
    let r = url_scenario();
    let submission = Submission::Url { url: "http://192.168.0.10/secure-login".into() };
    let doc = layout(&r, &aggregate(&r), &submission, &SubmitterInfo::default());

    let bytes = encode(&doc).expect("encode");
    let parsed = lopdf::Document::load_mem(&bytes).expect("parse back");
    assert_eq!(parsed.get_pages().len(), 1);
}

#[test]
fn test_block_on_missing_page_fails_whole_encode() {
    let mut doc = email_doc(2);
    let last = doc.blocks.len() - 1;
    doc.blocks[last].page = doc.page_count + 1;

    match encode(&doc) {
        Err(ExportError::UnsupportedBlock { index, .. }) => assert_eq!(index, last),
        other => panic!("expected unsupported block, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_non_finite_geometry_is_rejected() {
    let mut doc = email_doc(2);
    doc.blocks[1].y = f32::NAN;
    assert!(matches!(encode(&doc), Err(ExportError::UnsupportedBlock { index: 1, .. })));

    let mut doc = email_doc(2);
    doc.geometry.height = f32::INFINITY;
    assert!(matches!(encode(&doc), Err(ExportError::InvalidGeometry)));
}

#[test]
fn test_file_name_per_kind() {
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("valid time");
    assert_eq!(file_name(ContentKind::Email, at), "PhishGuard_Email_Report_1700000000123.pdf");
    assert_eq!(file_name(ContentKind::Sms, at), "PhishGuard_SMS_Report_1700000000123.pdf");
    assert_eq!(file_name(ContentKind::Url, at), "PhishGuard_URL_Report_1700000000123.pdf");
}

#[test]
fn test_export_and_write() {
    let doc = email_doc(3);
    let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("valid time");
    let file = export_report(&doc, ContentKind::Email, at).expect("export");

    assert_eq!(file.sha256.len(), 64);
    assert_eq!(file.file_name, "PhishGuard_Email_Report_1700000000000.pdf");

    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("reports");
    let path = file.write_to(&out).expect("write");

    assert_eq!(std::fs::read(&path).expect("read back"), file.bytes);
    let leftovers: Vec<_> = std::fs::read_dir(&out)
        .expect("list")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_latin1_replaces_unsupported_chars() {
    assert_eq!(latin1("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
    assert_eq!(latin1("\u{201C}hi\u{201D} \u{2014} \u{1F600}"), b"\"hi\" - ?".to_vec());
}
