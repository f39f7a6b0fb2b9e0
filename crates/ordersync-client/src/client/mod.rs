//! HTTP client for the orders REST API.
//!
//! Every request carries the static API key header and goes through the
//! client's [`RetryPolicy`]. Status codes are mapped onto [`SyncError`]
//! variants here, so retry and abort decisions downstream only look at
//! [`SyncError::kind`].

mod details;
mod pages;

use std::time::Duration;

use ordersync_core::AppConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::SyncError;
use crate::extract::text;
use crate::retry::RetryPolicy;
use crate::types::ListingParams;

pub const DEFAULT_BASE_URL: &str = "https://app.magis5.com.br/v1";
pub const DEFAULT_API_KEY_HEADER: &str = "X-MAGIS5-APIKEY";
const DEFAULT_USER_AGENT: &str = "ordersync/0.1 (order-reporting)";
const ORDERS_SEGMENT: &str = "orders";

/// Client for the orders API.
///
/// Use [`OrdersClient::from_config`] in the binary or
/// [`OrdersClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct OrdersClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl OrdersClient {
    /// Creates a client with the default key header and user agent.
    ///
    /// # Errors
    ///
    /// See [`OrdersClient::with_options`].
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, SyncError> {
        Self::with_options(
            base_url,
            DEFAULT_API_KEY_HEADER,
            api_key,
            timeout_secs,
            DEFAULT_USER_AGENT,
            retry,
        )
    }

    /// Builds a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`OrdersClient::with_options`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SyncError> {
        let retry = RetryPolicy::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
            config.backoff_multiplier,
        );
        Self::with_options(
            &config.base_url,
            &config.api_key_header,
            &config.api_key,
            config.request_timeout_secs,
            &config.user_agent,
            retry,
        )
    }

    /// Creates a client with every knob explicit.
    ///
    /// # Errors
    ///
    /// - [`SyncError::InvalidHeader`] if the header name or key value cannot be
    ///   sent as an HTTP header.
    /// - [`SyncError::InvalidBaseUrl`] if `base_url` does not parse or cannot
    ///   carry path segments.
    /// - [`SyncError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn with_options(
        base_url: &str,
        api_key_header: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, SyncError> {
        let name = HeaderName::from_bytes(api_key_header.as_bytes()).map_err(|e| {
            SyncError::InvalidHeader {
                name: api_key_header.to_owned(),
                reason: e.to_string(),
            }
        })?;
        let mut value = HeaderValue::from_str(api_key).map_err(|e| SyncError::InvalidHeader {
            name: api_key_header.to_owned(),
            reason: e.to_string(),
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            retry,
        })
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Verifies the API key with a one-item listing request.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Unauthorized`] on 401/403.
    /// - [`SyncError::RetriesExhausted`] if the API stays unreachable.
    /// - Any other non-2xx status or undecodable body.
    pub async fn check_auth(&self) -> Result<(), SyncError> {
        let url = self.build_url(&[ORDERS_SEGMENT], &[("limit", "1".to_owned())]);
        let url = &url;
        self.retry.execute(|| self.get_json(url)).await?;
        tracing::info!(url = %url, "API key accepted");
        Ok(())
    }

    /// Fetches one listing page and returns its `orders` array.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Malformed`] if the body has no `orders` array.
    /// - Status and transport errors as classified by [`SyncError::kind`],
    ///   after retries for transient ones.
    pub async fn fetch_orders_page(
        &self,
        endpoint: &str,
        params: &ListingParams,
        page: u32,
    ) -> Result<Vec<Value>, SyncError> {
        let segments: Vec<&str> = endpoint.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.build_url(&segments, &params.query_pairs(page));
        let url = &url;
        let body = self.retry.execute(|| self.get_json(url)).await?;

        match body {
            Value::Object(mut map) => match map.remove("orders") {
                Some(Value::Array(orders)) => Ok(orders),
                _ => Err(SyncError::Malformed {
                    context: format!("{endpoint} page {page}"),
                    reason: "missing `orders` array".to_owned(),
                }),
            },
            _ => Err(SyncError::Malformed {
                context: format!("{endpoint} page {page}"),
                reason: "listing body is not an object".to_owned(),
            }),
        }
    }

    /// Fetches the full order object for `id`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotFound`] on 404.
    /// - [`SyncError::Malformed`] if the body is not an object or lacks a
    ///   non-empty `id`.
    /// - Status and transport errors as classified by [`SyncError::kind`],
    ///   after retries for transient ones.
    pub async fn fetch_order(&self, id: &str) -> Result<Value, SyncError> {
        let url = self.build_url(&[ORDERS_SEGMENT, id], &[]);
        let url = &url;
        let body = self.retry.execute(|| self.get_json(url)).await?;

        if !body.is_object() {
            return Err(SyncError::Malformed {
                context: format!("order {id}"),
                reason: "detail body is not an object".to_owned(),
            });
        }
        if text(&body, &["id"]).trim().is_empty() {
            return Err(SyncError::Malformed {
                context: format!("order {id}"),
                reason: "detail body has no `id`".to_owned(),
            });
        }
        Ok(body)
    }

    /// Appends `segments` to the base path and `query` as encoded pairs.
    ///
    /// Each segment is percent-encoded on its own, so an id containing `/`
    /// cannot escape its path position.
    fn build_url(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Sends one GET and maps the status onto [`SyncError`]. Not retried.
    async fn get_json(&self, url: &Url) -> Result<Value, SyncError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Unauthorized {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound {
                url: url.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(SyncError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SyncError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SyncError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Parses `raw` and guarantees a trailing slash so appended segments land
/// under the base path instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, SyncError> {
    let normalised = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| SyncError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SyncError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "URL cannot carry path segments".to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
