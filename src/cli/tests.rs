//! Tests for the CLI module

use super::runner::check_to_json;
use super::*;
use crate::connector::{CheckResult, Message};
use crate::types::LogLevel;
use chrono::TimeZone;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_parse_read_command() {
    let cli = Cli::parse_from([
        "source-adp-workers",
        "--config",
        "config.json",
        "read",
        "--max-records",
        "10",
    ]);

    assert_eq!(cli.format, OutputFormat::Json);
    assert!(!cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("config.json"));
    match cli.command {
        Commands::Read {
            config_json,
            max_records,
        } => {
            assert!(config_json.is_none());
            assert_eq!(max_records, Some(10));
        }
        other => panic!("Expected Read, got {other:?}"),
    }
}

#[test]
fn test_parse_check_with_inline_config() {
    let cli = Cli::parse_from([
        "source-adp-workers",
        "check",
        "--config-json",
        r#"{"client_id":"x"}"#,
        "--format",
        "pretty",
        "-v",
    ]);

    assert_eq!(cli.format, OutputFormat::Pretty);
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Check { config_json: Some(_) }));
}

#[test]
fn test_parse_spec_and_discover() {
    assert!(matches!(
        Cli::parse_from(["source-adp-workers", "spec"]).command,
        Commands::Spec
    ));
    assert!(matches!(
        Cli::parse_from(["source-adp-workers", "discover"]).command,
        Commands::Discover { config_json: None }
    ));
}

#[test]
fn test_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["source-adp-workers", "--format", "parquet", "spec"]).is_err());
}

#[test]
fn test_record_message_json() {
    let emitted_at = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let message = Message::Record {
        stream: "workers".to_string(),
        data: json!({"associateOID": "G1"}),
        emitted_at,
    };

    assert_eq!(
        message_to_json(&message),
        json!({
            "type": "RECORD",
            "record": {
                "stream": "workers",
                "data": {"associateOID": "G1"},
                "emitted_at": 1_700_000_000_123_i64
            }
        })
    );
}

#[test]
fn test_log_message_json() {
    assert_eq!(
        message_to_json(&Message::log(LogLevel::Warn, "slow page")),
        json!({"type": "LOG", "log": {"level": "WARN", "message": "slow page"}})
    );
}

#[test]
fn test_check_result_json() {
    assert_eq!(
        check_to_json(&CheckResult::success()),
        json!({"type": "CONNECTION_STATUS", "connectionStatus": {"status": "SUCCEEDED"}})
    );
    assert_eq!(
        check_to_json(&CheckResult::failure("bad secret")),
        json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {"status": "FAILED", "message": "bad secret"}
        })
    );
}
