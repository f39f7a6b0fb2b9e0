pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod types;

pub use client::OrdersClient;
pub use error::{ErrorKind, SyncError};
pub use normalize::{normalize_detail, normalize_summaries, normalize_summary};
pub use pipeline::{OutcomeCounts, RunState, SyncOptions, SyncPipeline, SyncReport};
pub use retry::RetryPolicy;
pub use types::{FetchOutcome, ListingParams, PageWalk, StopReason};
