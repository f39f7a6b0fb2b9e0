use thiserror::Error;

/// Errors returned by the orders API client and the sync pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network, timeout or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401/403. Fatal for the whole run.
    #[error("authentication rejected (HTTP {status}) by {url}")]
    Unauthorized { status: u16, url: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("server error (HTTP {status}) from {url}")]
    ServerError { status: u16, url: String },

    /// Any other non-2xx status; not retried.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed as JSON but lacks a field the caller requires.
    #[error("malformed payload for {context}: {reason}")]
    Malformed { context: String, reason: String },

    /// A transient error persisted through every allowed attempt.
    #[error("gave up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<SyncError>,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid request header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Failure taxonomy used to decide retry and propagation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, connection failure, 5xx. Retried with backoff.
    Transient,
    /// 4xx other than 401/403, or a local request-building problem. Fails fast.
    Client,
    /// 401/403. Aborts the run.
    Auth,
    /// Undecodable or structurally invalid payload.
    Malformed,
    RetriesExhausted,
}

impl SyncError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Http(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
                    ErrorKind::Transient
                } else if e.is_decode() {
                    ErrorKind::Malformed
                } else if e.status().is_some_and(|s| s.is_server_error()) {
                    ErrorKind::Transient
                } else {
                    ErrorKind::Client
                }
            }
            SyncError::ServerError { .. } => ErrorKind::Transient,
            SyncError::Unauthorized { .. } => ErrorKind::Auth,
            SyncError::NotFound { .. }
            | SyncError::UnexpectedStatus { .. }
            | SyncError::InvalidBaseUrl { .. }
            | SyncError::InvalidHeader { .. } => ErrorKind::Client,
            SyncError::Deserialize { .. } | SyncError::Malformed { .. } => ErrorKind::Malformed,
            SyncError::RetriesExhausted { .. } => ErrorKind::RetriesExhausted,
        }
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}
