//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_workers_passthrough_in_order() {
    let decoder = JsonDecoder::workers();
    let body = json!({
        "workers": [
            {"associateOID": "G3", "workerID": {"idValue": "3"}, "extra": [1, 2]},
            {"associateOID": "G1", "workerID": {"idValue": "1"}},
            {"associateOID": "G2", "workerStatus": {"statusCode": {"codeValue": "Active"}}}
        ],
        "meta": {"totalNumber": 3}
    });

    let records = decoder.decode(&body.to_string()).unwrap();

    assert_eq!(
        records,
        vec![
            json!({"associateOID": "G3", "workerID": {"idValue": "3"}, "extra": [1, 2]}),
            json!({"associateOID": "G1", "workerID": {"idValue": "1"}}),
            json!({"associateOID": "G2", "workerStatus": {"statusCode": {"codeValue": "Active"}}}),
        ]
    );
}

#[test]
fn test_empty_workers_array() {
    let decoder = JsonDecoder::workers();
    let records = decoder.decode(r#"{"workers": []}"#).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_empty_body_is_empty_page() {
    let decoder = JsonDecoder::workers();
    assert!(decoder.decode("").unwrap().is_empty());
    assert!(decoder.decode("  \n").unwrap().is_empty());
}

#[test]
fn test_null_workers_is_empty_page() {
    let decoder = JsonDecoder::workers();
    assert!(decoder.decode(r#"{"workers": null}"#).unwrap().is_empty());
}

#[test]
fn test_missing_workers_field() {
    let decoder = JsonDecoder::workers();
    let err = decoder.decode(r#"{"meta": {}}"#).unwrap_err();
    match err {
        Error::RecordExtraction { path, message } => {
            assert_eq!(path, "workers");
            assert!(message.contains("not found"));
        }
        other => panic!("Expected RecordExtraction, got {other}"),
    }
}

#[test]
fn test_workers_not_an_array() {
    let decoder = JsonDecoder::workers();
    let err = decoder.decode(r#"{"workers": {"id": 1}}"#).unwrap_err();
    assert!(err.to_string().contains("expected an array, found object"));
}

#[test]
fn test_invalid_json() {
    let decoder = JsonDecoder::workers();
    let err = decoder.decode("{not json").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_nested_path() {
    let decoder = JsonDecoder::with_path("$.data.items");
    let records = decoder
        .extract(json!({"data": {"items": [{"id": 1}, {"id": 2}]}}))
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(decoder.record_path(), "$.data.items");
}

// ============================================================================
// Total Count Decoder Tests
// ============================================================================

#[test]
fn test_total_count_number() {
    let decoder = TotalCountDecoder::default();
    assert_eq!(decoder.total(&json!({"meta": {"totalNumber": 250}})).unwrap(), 250);
}

#[test]
fn test_total_count_string() {
    let decoder = TotalCountDecoder::default();
    assert_eq!(decoder.total(&json!({"meta": {"totalNumber": "1200"}})).unwrap(), 1200);
}

#[test]
fn test_total_count_missing() {
    let decoder = TotalCountDecoder::default();
    let err = decoder.total(&json!({"workers": []})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref field, .. } if field == "meta.totalNumber"));
}

#[test]
fn test_total_count_negative() {
    let decoder = TotalCountDecoder::default();
    let err = decoder.total(&json!({"meta": {"totalNumber": -3}})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[test]
fn test_total_count_body() {
    let decoder = TotalCountDecoder::default();
    assert_eq!(decoder.decode(r#"{"meta": {"totalNumber": 42}}"#).unwrap(), 42);
}

#[test]
fn test_total_count_invalid_json() {
    let decoder = TotalCountDecoder::default();
    let err = decoder.decode("<html>maintenance</html>").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref field, .. } if field == "meta.totalNumber"));
}
