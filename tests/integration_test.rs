//! Integration tests for subnet-calculator
//!
//! These tests verify the complete workflow from loading range tables to
//! answering contract requests.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use subnet_calculator::config::Config;
use subnet_calculator::output::Handler;
use subnet_calculator::ranges::{
    cache_file_path, cloudflare_builtin, load_cloudflare_table, read_range_cache, RangeSource,
};
use subnet_calculator::{
    classify_cloudflare, classify_private, compute_subnet_info, parse_address, validate,
    AddressCount, CloudMode,
};

const TEST_CACHE: &str = "src/tests/test_data/cloudflare_ranges_cache_01.json";

fn handle(handler: &Handler, operation: &str, body: Value) -> Value {
    let response = handler
        .handle(operation, &body.to_string())
        .unwrap_or_else(|e| panic!("{operation} failed: {e}"));
    serde_json::from_str(&response).expect("response is JSON")
}

#[test]
fn test_full_workflow_with_cache() {
    let table = read_range_cache(Path::new(TEST_CACHE)).expect("Failed to read range cache");
    assert_eq!(table.source, RangeSource::Cache);

    let handler = Handler::new(table, CloudMode::Standard);

    let response = handle(&handler, "validate", json!({"address": "104.16.0.0/13"}));
    assert_eq!(response["type"], "network");
    assert_eq!(response["num_addresses"], 524288);

    let response = handle(&handler, "check-cloudflare", json!({"address": "104.16.1.1"}));
    assert_eq!(response["matched_ranges"], json!(["104.16.0.0/13"]));

    // only in the builtin table
    let response = handle(&handler, "check-cloudflare", json!({"address": "198.41.128.1"}));
    assert_eq!(response["is_cloudflare"], false);

    let response = handle(&handler, "check-private", json!({"address": "172.20.0.0/16"}));
    assert_eq!(response["matched_rfc1918_range"], "172.16.0.0/12");

    let response = handle(&handler, "subnet-info", json!({"network": "10.0.0.0/24"}));
    assert_eq!(response["mode"], "Standard");
    assert_eq!(response["usable_addresses"], 254);
}

#[test]
fn test_library_api() {
    let result = validate("2001:db8::/32");
    assert_eq!(result.is_ipv6, Some(true));
    assert_eq!(result.is_ipv4, Some(false));

    let private = classify_private(&parse_address("192.168.1.1").unwrap());
    assert!(private.is_rfc1918);
    assert_eq!(private.matched_rfc1918_range.as_deref(), Some("192.168.0.0/16"));

    let shared = classify_private(&parse_address("100.64.1.1").unwrap());
    assert!(shared.is_rfc6598);

    let cloudflare = classify_cloudflare(&parse_address("8.8.8.8").unwrap(), cloudflare_builtin());
    assert!(!cloudflare.is_cloudflare);
    assert!(cloudflare.matched_ranges.is_empty());

    let info = compute_subnet_info("192.168.1.0/24", CloudMode::Azure).unwrap();
    assert_eq!(info.usable_addresses, AddressCount::Exact(251));
    assert_eq!(info.network_address.to_string(), "192.168.1.0");
    assert_eq!(info.broadcast_address.unwrap().to_string(), "192.168.1.255");
}

#[test]
fn test_subnet_info_modes_agree_on_ipv6() {
    let handler = Handler::default();
    for mode in ["Standard", "Azure", "AWS", "OCI"] {
        let response = handle(
            &handler,
            "subnet-info",
            json!({"network": "2001:db8::/112", "mode": mode}),
        );
        assert_eq!(response["mode"], mode);
        assert_eq!(response["broadcast_address"], Value::Null);
        assert_eq!(response["usable_addresses"], response["total_addresses"]);
        assert_eq!(response["usable_addresses"], 65536);
    }
}

#[test]
fn test_error_statuses() {
    let handler = Handler::default();
    let cases = [
        ("validate", r#"{"address": "300.1.1.1"}"#, 400),
        ("check-private", r#"{"address": "fd00::/8"}"#, 400),
        ("subnet-info", r#"{"network": "10.0.0.0/24", "mode": "GCP"}"#, 400),
        ("subnet-info", r#"{"mode": "Azure"}"#, 422),
        ("subnets", r#"{}"#, 404),
    ];
    for (operation, body, status) in cases {
        let err = handler.handle(operation, body).unwrap_err();
        assert_eq!(err.status_code(), status, "{operation} {body}");
        let detail: Value = serde_json::from_str(&err.to_json()).unwrap();
        assert!(detail["detail"].is_string());
    }
}

#[tokio::test]
async fn test_refresh_reads_todays_cache() {
    let dir = std::env::temp_dir().join(format!("subnet_calculator_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let today = chrono::Utc::now().date_naive();
    std::fs::copy(TEST_CACHE, cache_file_path(&dir, today)).expect("Failed to copy cache");

    let config = Config {
        refresh_cloudflare: true,
        cache_dir: dir.clone(),
        ..Config::default()
    };
    let table = load_cloudflare_table(&config).await;
    assert_eq!(table.source, RangeSource::Cache);
    assert_eq!(table.version, "2025-06-01");

    std::fs::remove_dir_all(dir).ok();
}
