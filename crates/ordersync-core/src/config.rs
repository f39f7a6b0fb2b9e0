use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), chrono::Utc::now().timestamp())
}

/// Build application configuration using the provided env-var lookup function.
///
/// `now` is the unix timestamp used when `ORDERSYNC_TIMESTAMP_TO` is unset, so
/// the listing window is reproducible under test.
fn build_app_config<F>(lookup: F, now: i64) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        or_default(var, default)
            .parse::<i64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_key = require("ORDERSYNC_API_KEY")?;

    let base_url = or_default("ORDERSYNC_BASE_URL", "https://app.magis5.com.br/v1");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "ORDERSYNC_BASE_URL",
            format!("expected an http(s) URL, got '{base_url}'"),
        ));
    }

    let api_key_header = or_default("ORDERSYNC_API_KEY_HEADER", "X-MAGIS5-APIKEY");
    let log_level = or_default("ORDERSYNC_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("ORDERSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ORDERSYNC_USER_AGENT", "ordersync/0.1 (order-reporting)");

    let page_size = parse_u32("ORDERSYNC_PAGE_SIZE", "50")?;
    if page_size == 0 {
        return Err(invalid("ORDERSYNC_PAGE_SIZE", "must be at least 1".into()));
    }
    let max_pages = parse_u32("ORDERSYNC_MAX_PAGES", "20000")?;
    let page_delay_ms = parse_u64("ORDERSYNC_PAGE_DELAY_MS", "500")?;

    let max_attempts = parse_u32("ORDERSYNC_MAX_ATTEMPTS", "5")?;
    if max_attempts == 0 {
        return Err(invalid("ORDERSYNC_MAX_ATTEMPTS", "must be at least 1".into()));
    }
    let backoff_base_ms = parse_u64("ORDERSYNC_BACKOFF_BASE_MS", "1000")?;
    let backoff_multiplier = parse_f64("ORDERSYNC_BACKOFF_MULTIPLIER", "2.0")?;
    if !backoff_multiplier.is_finite() || backoff_multiplier < 1.0 {
        return Err(invalid(
            "ORDERSYNC_BACKOFF_MULTIPLIER",
            format!("must be a finite number >= 1.0, got {backoff_multiplier}"),
        ));
    }

    let max_concurrent_details = parse_usize("ORDERSYNC_MAX_CONCURRENT_DETAILS", "10")?;
    if max_concurrent_details == 0 {
        return Err(invalid(
            "ORDERSYNC_MAX_CONCURRENT_DETAILS",
            "must be at least 1".into(),
        ));
    }

    let date_search_type = or_default("ORDERSYNC_DATE_SEARCH_TYPE", "created");
    let order_status = or_default("ORDERSYNC_ORDER_STATUS", "all");
    let timestamp_from = parse_i64("ORDERSYNC_TIMESTAMP_FROM", "1577836800")?;
    let timestamp_to = parse_i64("ORDERSYNC_TIMESTAMP_TO", &now.to_string())?;
    if timestamp_to < timestamp_from {
        return Err(invalid(
            "ORDERSYNC_TIMESTAMP_TO",
            format!("{timestamp_to} is earlier than ORDERSYNC_TIMESTAMP_FROM ({timestamp_from})"),
        ));
    }

    Ok(AppConfig {
        base_url,
        api_key,
        api_key_header,
        log_level,
        request_timeout_secs,
        user_agent,
        page_size,
        max_pages,
        page_delay_ms,
        max_attempts,
        backoff_base_ms,
        backoff_multiplier,
        max_concurrent_details,
        date_search_type,
        order_status,
        timestamp_from,
        timestamp_to,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
