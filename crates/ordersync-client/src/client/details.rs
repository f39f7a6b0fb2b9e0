//! Bounded-concurrency detail fetch for `OrdersClient`.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::error::{ErrorKind, SyncError};
use crate::normalize::normalize_detail;
use crate::types::FetchOutcome;

use super::OrdersClient;

/// Completions between progress events.
const PROGRESS_EVERY: usize = 10;

impl OrdersClient {
    /// Fetches the detail of every distinct id with at most `max_concurrent`
    /// requests in flight.
    ///
    /// Ids are deduplicated by exact string and dispatched as given, so the
    /// map is keyed by the submitted ids. Each dispatched id yields exactly one [`FetchOutcome`], whatever happened to
    /// the others. Results are gathered at a single collecting point, so the
    /// returned map is complete only once every fetch has finished. Its
    /// iteration order says nothing about completion order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthorized`] if any fetch is rejected with
    /// 401/403. Fetches still in flight are abandoned.
    pub async fn fetch_details<I>(
        &self,
        ids: I,
        max_concurrent: usize,
    ) -> Result<HashMap<String, FetchOutcome>, SyncError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_owned())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let total = unique.len();
        tracing::info!(total, max_concurrent, "fetching order details");

        let mut results = HashMap::with_capacity(total);
        let mut completions = stream::iter(unique)
            .map(|id| {
                let span = tracing::info_span!("order", order_id = %id);
                async move {
                    let outcome = self.fetch_detail_outcome(&id).await;
                    (id, outcome)
                }
                .instrument(span)
            })
            .buffer_unordered(max_concurrent.max(1));

        while let Some((id, outcome)) = completions.next().await {
            let outcome = outcome?;
            if !outcome.is_success() {
                tracing::warn!(order_id = %id, outcome = outcome.label(), "order detail unavailable");
            }
            results.insert(id, outcome);

            let completed = results.len();
            if completed % PROGRESS_EVERY == 0 || completed == total {
                tracing::info!(completed, total, "detail fetch progress");
            }
        }

        Ok(results)
    }

    /// Fetches one order and folds every per-item failure into an outcome.
    ///
    /// Only an auth rejection escapes as `Err`.
    async fn fetch_detail_outcome(&self, id: &str) -> Result<FetchOutcome, SyncError> {
        let err = match self.fetch_order(id).await {
            Ok(raw) => return Ok(FetchOutcome::Success(normalize_detail(&raw))),
            Err(err) => err,
        };

        if err.is_auth() {
            tracing::error!(order_id = %id, error = %err, "authentication rejected");
            return Err(err);
        }

        let outcome = match &err {
            SyncError::NotFound { .. } => FetchOutcome::NotFound,
            SyncError::RetriesExhausted { attempts, last } => {
                tracing::error!(
                    order_id = %id,
                    attempts,
                    error = %last,
                    "detail fetch failed after retries"
                );
                FetchOutcome::RetriesExhausted {
                    attempts: *attempts,
                    last_error: last.to_string(),
                }
            }
            other if other.kind() == ErrorKind::Malformed => {
                tracing::warn!(order_id = %id, error = %err, "malformed order detail");
                FetchOutcome::Malformed {
                    last_error: err.to_string(),
                }
            }
            _ => {
                tracing::warn!(order_id = %id, error = %err, "order detail request rejected");
                FetchOutcome::Rejected {
                    last_error: err.to_string(),
                }
            }
        };
        Ok(outcome)
    }
}
