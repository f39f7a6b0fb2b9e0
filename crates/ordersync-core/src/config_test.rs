use std::collections::HashMap;
use std::env::VarError;

use super::*;

const NOW: i64 = 1_760_000_000;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("ORDERSYNC_API_KEY", "test-key");
    m
}

fn assert_invalid(var: &str, value: &str) {
    let mut map = full_env();
    map.insert(var, value);
    let result = build_app_config(lookup_from_map(&map), NOW);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { var: ref v, .. }) if v == var),
        "expected InvalidEnvVar({var}) for {value:?}, got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map), NOW);
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ORDERSYNC_API_KEY"),
        "expected MissingEnvVar(ORDERSYNC_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("ORDERSYNC_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map), NOW);
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map), NOW);
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_key, "test-key");
    assert_eq!(cfg.base_url, "https://app.magis5.com.br/v1");
    assert_eq!(cfg.api_key_header, "X-MAGIS5-APIKEY");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "ordersync/0.1 (order-reporting)");
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.max_pages, 20_000);
    assert_eq!(cfg.page_delay_ms, 500);
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.backoff_base_ms, 1_000);
    assert!((cfg.backoff_multiplier - 2.0).abs() < f64::EPSILON);
    assert_eq!(cfg.max_concurrent_details, 10);
    assert_eq!(cfg.date_search_type, "created");
    assert_eq!(cfg.order_status, "all");
    assert_eq!(cfg.timestamp_from, 1_577_836_800);
    assert_eq!(cfg.timestamp_to, NOW);
}

#[test]
fn overrides_are_applied() {
    let mut map = full_env();
    map.insert("ORDERSYNC_BASE_URL", "http://localhost:8080/v1");
    map.insert("ORDERSYNC_PAGE_SIZE", "20");
    map.insert("ORDERSYNC_MAX_PAGES", "3");
    map.insert("ORDERSYNC_MAX_ATTEMPTS", "3");
    map.insert("ORDERSYNC_BACKOFF_MULTIPLIER", "1.5");
    map.insert("ORDERSYNC_MAX_CONCURRENT_DETAILS", "4");
    map.insert("ORDERSYNC_TIMESTAMP_FROM", "1641006000");
    map.insert("ORDERSYNC_TIMESTAMP_TO", "1700000000");
    let cfg = build_app_config(lookup_from_map(&map), NOW).unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8080/v1");
    assert_eq!(cfg.page_size, 20);
    assert_eq!(cfg.max_pages, 3);
    assert_eq!(cfg.max_attempts, 3);
    assert!((cfg.backoff_multiplier - 1.5).abs() < f64::EPSILON);
    assert_eq!(cfg.max_concurrent_details, 4);
    assert_eq!(cfg.timestamp_from, 1_641_006_000);
    assert_eq!(cfg.timestamp_to, 1_700_000_000);
}

#[test]
fn non_numeric_values_are_rejected() {
    assert_invalid("ORDERSYNC_REQUEST_TIMEOUT_SECS", "not-a-number");
    assert_invalid("ORDERSYNC_PAGE_SIZE", "fifty");
    assert_invalid("ORDERSYNC_MAX_PAGES", "-1");
    assert_invalid("ORDERSYNC_PAGE_DELAY_MS", "soon");
    assert_invalid("ORDERSYNC_BACKOFF_BASE_MS", "1s");
    assert_invalid("ORDERSYNC_TIMESTAMP_FROM", "yesterday");
}

#[test]
fn zero_page_size_is_rejected() {
    assert_invalid("ORDERSYNC_PAGE_SIZE", "0");
}

#[test]
fn zero_attempts_is_rejected() {
    assert_invalid("ORDERSYNC_MAX_ATTEMPTS", "0");
}

#[test]
fn zero_concurrency_is_rejected() {
    assert_invalid("ORDERSYNC_MAX_CONCURRENT_DETAILS", "0");
}

#[test]
fn shrinking_backoff_is_rejected() {
    assert_invalid("ORDERSYNC_BACKOFF_MULTIPLIER", "0.5");
    assert_invalid("ORDERSYNC_BACKOFF_MULTIPLIER", "NaN");
}

#[test]
fn non_http_base_url_is_rejected() {
    assert_invalid("ORDERSYNC_BASE_URL", "ftp://example.com");
}

#[test]
fn inverted_time_window_is_rejected() {
    let mut map = full_env();
    map.insert("ORDERSYNC_TIMESTAMP_FROM", "200");
    map.insert("ORDERSYNC_TIMESTAMP_TO", "100");
    let result = build_app_config(lookup_from_map(&map), NOW);
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ORDERSYNC_TIMESTAMP_TO")
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map), NOW).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "api key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
