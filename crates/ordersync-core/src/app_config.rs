#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_key_header: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Listing `limit`; a page shorter than this is the last one.
    pub page_size: u32,
    /// Hard ceiling on listing pages requested in one run.
    pub max_pages: u32,
    pub page_delay_ms: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_multiplier: f64,
    pub max_concurrent_details: usize,
    pub date_search_type: String,
    pub order_status: String,
    /// Unix seconds, inclusive lower bound of the listing window.
    pub timestamp_from: i64,
    /// Unix seconds, upper bound of the listing window.
    pub timestamp_to: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("api_key_header", &self.api_key_header)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_concurrent_details", &self.max_concurrent_details)
            .field("date_search_type", &self.date_search_type)
            .field("order_status", &self.order_status)
            .field("timestamp_from", &self.timestamp_from)
            .field("timestamp_to", &self.timestamp_to)
            .finish()
    }
}
