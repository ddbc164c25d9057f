use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use chrono::{Duration, Local, TimeZone, Utc};
use tempfile::tempdir;

use super::*;
use crate::logic::analysis::Submission;
use crate::logic::fixtures::{email_submission, result, url_scenario};

fn record(submitter: &str, is_phishing: bool, minutes_ago: i64) -> ScanRecord {
    let mut r = ScanRecord::new(submitter, email_submission(), result(is_phishing, None));
    r.created_at = Utc::now() - Duration::minutes(minutes_ago);
    r
}

#[test]
fn test_append_and_list_newest_first() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    let old = record("alice", true, 30);
    let new = record("alice", false, 5);
    let other = record("bob", true, 1);

    store.append(&old).unwrap();
    store.append(&new).unwrap();
    store.append(&other).unwrap();

    let listed = store.list_by_submitter("alice", 10).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, new.id);
    assert_eq!(listed[1].id, old.id);

    let limited = store.list_by_submitter("alice", 1).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, new.id);
}

#[test]
fn test_round_trip_keeps_explanation() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    let rec = ScanRecord::new(
        "alice",
        Submission::Url { url: "http://10.0.0.1/login".into() },
        url_scenario(),
    );
    store.append(&rec).unwrap();

    let loaded = store.get(&rec.id).unwrap().expect("stored record");
    assert_eq!(loaded.submission, rec.submission);
    assert_eq!(loaded.result, rec.result);
    assert_eq!(
        loaded.created_at.timestamp_millis(),
        rec.created_at.timestamp_millis()
    );
}

#[test]
fn test_get_and_delete_missing() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    assert!(store.get("nope").unwrap().is_none());
    assert!(!store.delete("nope").unwrap());

    let rec = record("alice", true, 1);
    store.append(&rec).unwrap();
    assert!(store.delete(&rec.id).unwrap());
    assert!(store.get(&rec.id).unwrap().is_none());
}

#[test]
fn test_unreadable_rows_are_skipped() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    let good = record("alice", true, 1);
    store.append(&good).unwrap();
    store
        .conn
        .lock()
        .execute(
            "INSERT INTO scans VALUES ('bad', 'alice', 'email', 0, '{', '{}', '2024-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

    let listed = store.list_by_submitter("alice", 10).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);

    let stats = store.stats("alice").unwrap();
    assert_eq!(stats.total_scans, listed.len());
    assert_eq!(stats.threats_detected, 1);
    assert_eq!(stats.safe_content, 0);
}

#[test]
fn test_legacy_empty_explanation_loads() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store
        .conn
        .lock()
        .execute(
            "INSERT INTO scans VALUES ('legacy', 'alice', 'sms', 1,
             '{\"type\":\"sms\",\"message\":\"Your parcel is held\"}',
             '{\"is_phishing\":true,\"confidence\":0.9,\"risk_score\":88,\"severity\":\"HIGH\",\"explanation\":\"\"}',
             '2024-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

    let loaded = store.get("legacy").unwrap().expect("legacy record");
    assert!(loaded.result.explanation.is_none());
    assert_eq!(loaded.result.risk_score, 88);
}

#[test]
fn test_stats_counts() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store.append(&record("alice", true, 0)).unwrap();
    store.append(&record("alice", false, 0)).unwrap();
    store.append(&record("alice", true, 0)).unwrap();

    let mut stale = record("alice", false, 0);
    stale.created_at = Utc::now() - Duration::days(3);
    store.append(&stale).unwrap();
    store.append(&record("bob", true, 0)).unwrap();

    let stats = store.stats("alice").unwrap();
    assert_eq!(stats.total_scans, 4);
    assert_eq!(stats.threats_detected, 2);
    assert_eq!(stats.safe_content, 2);
    assert_eq!(stats.today_scans, 3);

    assert_eq!(store.stats("nobody").unwrap(), ScanStats::default());
}

#[test]
fn test_compute_stats_matches_store() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    for (i, phishing) in [true, false, false].into_iter().enumerate() {
        store.append(&record("alice", phishing, i as i64)).unwrap();
    }
    let records = store.list_by_submitter("alice", ALL_RECORDS).unwrap();
    let since = local_midnight(Local::now()) - Duration::days(1);
    let computed = compute_stats(&records, since);
    assert_eq!(computed.total_scans, 3);
    assert_eq!(computed.threats_detected, 1);
    assert_eq!(computed.today_scans, 3);
}

#[test]
fn test_local_midnight_is_start_of_day() {
    let now = Local.with_ymd_and_hms(2025, 6, 1, 15, 45, 0).single().expect("valid time");
    let midnight = local_midnight(now).with_timezone(&Local);
    assert_eq!(midnight.date_naive(), now.date_naive());
    assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
}

#[test]
fn test_file_store_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("scans.db");
    let rec = record("alice", true, 1);

    {
        let store = SqliteRecordStore::open(&path).unwrap();
        store.append(&rec).unwrap();
    }

    let reopened = SqliteRecordStore::open(&path).unwrap();
    assert_eq!(reopened.list_by_submitter("alice", 5).unwrap().len(), 1);
}

// ============================================================================
// REMOTE STORE
// ============================================================================

/// Serve canned responses, one per connection, and report request lines
fn serve(responses: Vec<(u16, String)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
            }
            let mut body_in = vec![0u8; content_length];
            reader.read_exact(&mut body_in).unwrap();
            seen.push(request_line.trim().to_string());

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
        }
        seen
    });

    (format!("http://{}", addr), handle)
}

#[test]
fn test_remote_list_falls_back_to_local_sort() {
    let older = record("alice", true, 60);
    let newer = record("alice", false, 1);
    let body = serde_json::to_string(&vec![older.clone(), newer.clone()]).unwrap();

    let (url, handle) = serve(vec![(400, "{\"error\":\"order\"}".to_string()), (200, body)]);
    let store = RemoteRecordStore::new(url, 5);

    let listed = store.list_by_submitter("alice", 10).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);

    let seen = handle.join().unwrap();
    assert!(seen[0].contains("order=created_at.desc"));
    assert!(!seen[1].contains("order="));
}

#[test]
fn test_remote_get_missing_and_server_error() {
    let (url, handle) = serve(vec![
        (404, "{}".to_string()),
        (503, "{}".to_string()),
    ]);
    let store = RemoteRecordStore::new(url, 5);

    assert!(store.get("missing").unwrap().is_none());
    let err = store.delete("x").unwrap_err();
    assert!(matches!(err, StoreError::Server(503)));
    assert!(err.is_retryable());

    let seen = handle.join().unwrap();
    assert!(seen[1].starts_with("DELETE /scans/x"));
}

#[test]
fn test_remote_record_id_is_one_path_segment() {
    let (url, handle) = serve(vec![(404, "{}".to_string()), (404, "{}".to_string())]);
    let store = RemoteRecordStore::new(url, 5);

    assert!(store.get("../admin?x=1").unwrap().is_none());
    assert!(!store.delete("a/b").unwrap());

    let seen = handle.join().unwrap();
    assert!(seen[0].starts_with("GET /scans/..%2Fadmin%3Fx=1 "), "{}", seen[0]);
    assert!(seen[1].starts_with("DELETE /scans/a%2Fb "), "{}", seen[1]);
}

#[test]
fn test_remote_invalid_base_url() {
    let store = RemoteRecordStore::new("not a url", 5);
    let err = store.get("abc").unwrap_err();
    assert!(matches!(err, StoreError::InvalidUrl(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_remote_append_posts_json() {
    let (url, handle) = serve(vec![(201, "{}".to_string())]);
    let store = RemoteRecordStore::new(format!("{}/", url), 5);

    store.append(&record("alice", true, 1)).unwrap();
    let seen = handle.join().unwrap();
    assert_eq!(seen, vec!["POST /scans HTTP/1.1".to_string()]);
}
