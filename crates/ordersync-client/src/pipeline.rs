//! One sync run: auth check, page walk, detail fetch, normalization and
//! correlation, driven as an explicit state machine.
//!
//! ```text
//! Init -> AuthCheck -> PageWalk -> DetailFetch -> Normalize -> Correlate -> ExportReady -> Done
//!            \____________\______________\___________________________________> Aborted
//! ```
//!
//! An auth rejection at any network stage aborts the run and discards
//! everything collected. Retry exhaustion in the page walk or the detail
//! fetch only raises the `partial` flag; the run carries on with what it has.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use ordersync_core::{
    canonical_key, correlate, merged_columns, AppConfig, DetailRecord, MergedDataset,
    SummaryRecord,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::OrdersClient;
use crate::error::SyncError;
use crate::normalize::normalize_summaries;
use crate::types::{FetchOutcome, ListingParams, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Init,
    AuthCheck,
    PageWalk,
    DetailFetch,
    Normalize,
    Correlate,
    ExportReady,
    Done,
    Aborted,
}

/// Per-run knobs that are not part of the HTTP client itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Listing path relative to the base URL.
    pub endpoint: String,
    pub listing: ListingParams,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub max_concurrent_details: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            endpoint: "orders".to_owned(),
            listing: ListingParams::default(),
            max_pages: 20_000,
            page_delay: Duration::from_millis(500),
            max_concurrent_details: 10,
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            listing: ListingParams {
                date_search_type: config.date_search_type.clone(),
                limit: config.page_size,
                status: config.order_status.clone(),
                timestamp_from: config.timestamp_from,
                timestamp_to: config.timestamp_to,
                ..ListingParams::default()
            },
            max_pages: config.max_pages,
            page_delay: Duration::from_millis(config.page_delay_ms),
            max_concurrent_details: config.max_concurrent_details,
            ..Self::default()
        }
    }
}

/// Number of detail fetches per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: usize,
    pub not_found: usize,
    pub retries_exhausted: usize,
    pub malformed: usize,
    pub rejected: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Success(_) => self.success += 1,
            FetchOutcome::NotFound => self.not_found += 1,
            FetchOutcome::RetriesExhausted { .. } => self.retries_exhausted += 1,
            FetchOutcome::Malformed { .. } => self.malformed += 1,
            FetchOutcome::Rejected { .. } => self.rejected += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.success + self.not_found + self.retries_exhausted + self.malformed + self.rejected
    }
}

/// Everything a run produced, handed to the export side.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub state: RunState,
    /// Every state entered, in order, starting with `Init`.
    pub history: Vec<RunState>,
    pub partial: bool,
    pub abort_reason: Option<String>,
    pub walk_stop: Option<StopReason>,
    pub pages_fetched: u32,
    pub raw_orders: usize,
    pub dropped_summaries: usize,
    pub outcomes: OutcomeCounts,
    pub summaries: Vec<SummaryRecord>,
    pub details: Vec<DetailRecord>,
    pub merged: MergedDataset,
}

impl SyncReport {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state == RunState::Aborted
    }
}

/// Drives a single run against an [`OrdersClient`].
pub struct SyncPipeline<'a> {
    client: &'a OrdersClient,
    options: SyncOptions,
    report: SyncReport,
}

impl<'a> SyncPipeline<'a> {
    #[must_use]
    pub fn new(client: &'a OrdersClient, options: SyncOptions) -> Self {
        Self {
            client,
            options,
            report: SyncReport {
                run_id: Uuid::new_v4(),
                state: RunState::Init,
                history: vec![RunState::Init],
                partial: false,
                abort_reason: None,
                walk_stop: None,
                pages_fetched: 0,
                raw_orders: 0,
                dropped_summaries: 0,
                outcomes: OutcomeCounts::default(),
                summaries: Vec::new(),
                details: Vec::new(),
                merged: MergedDataset {
                    columns: merged_columns(),
                    rows: Vec::new(),
                },
            },
        }
    }

    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.report.run_id
    }

    /// Runs every stage and returns the report. Never fails: fatal problems
    /// end in [`RunState::Aborted`] with `abort_reason` set.
    pub async fn run(self) -> SyncReport {
        let span = tracing::info_span!(
            "sync_run",
            run_id = %self.report.run_id,
            endpoint = %self.options.endpoint
        );
        self.run_stages().instrument(span).await
    }

    async fn run_stages(mut self) -> SyncReport {
        tracing::info!("sync run started");

        self.enter(RunState::AuthCheck);
        if let Err(err) = self.client.check_auth().await {
            let reason = if err.is_auth() {
                format!("authentication rejected: {err}")
            } else {
                format!("connection check failed: {err}")
            };
            return self.abort(reason);
        }

        self.enter(RunState::PageWalk);
        let walk = match self
            .client
            .fetch_all_orders(
                &self.options.endpoint,
                &self.options.listing,
                self.options.max_pages,
                self.options.page_delay,
            )
            .await
        {
            Ok(walk) => walk,
            Err(err) => return self.abort_unauthorized(&err),
        };
        self.report.walk_stop = Some(walk.stop);
        self.report.pages_fetched = walk.pages_fetched;
        self.report.raw_orders = walk.orders.len();
        if walk.partial {
            self.mark_partial("page walk");
        }

        let (summaries, dropped) = normalize_summaries(&walk.orders);
        self.report.dropped_summaries = dropped;
        let ids = first_seen_ids(&summaries);

        self.enter(RunState::DetailFetch);
        let mut outcomes = match self
            .client
            .fetch_details(&ids, self.options.max_concurrent_details)
            .await
        {
            Ok(outcomes) => outcomes,
            Err(err) => return self.abort_unauthorized(&err),
        };
        for outcome in outcomes.values() {
            self.report.outcomes.record(outcome);
        }
        if self.report.outcomes.retries_exhausted > 0 {
            self.mark_partial("detail fetch");
        }

        self.enter(RunState::Normalize);
        let details = details_in_order(&ids, &mut outcomes);

        self.enter(RunState::Correlate);
        let merged = correlate(&summaries, &details);

        self.report.summaries = summaries;
        self.report.details = details;
        self.report.merged = merged;
        self.enter(RunState::ExportReady);

        tracing::info!(
            summaries = self.report.summaries.len(),
            details = self.report.details.len(),
            merged = self.report.merged.len(),
            partial = self.report.partial,
            outcomes = ?self.report.outcomes,
            "datasets ready for export"
        );

        self.enter(RunState::Done);
        self.report
    }

    fn enter(&mut self, state: RunState) {
        tracing::debug!(from = ?self.report.state, to = ?state, "state transition");
        self.report.state = state;
        self.report.history.push(state);
    }

    fn mark_partial(&mut self, stage: &str) {
        if !self.report.partial {
            tracing::warn!(stage, "run marked partial");
        }
        self.report.partial = true;
    }

    fn abort_unauthorized(self, err: &SyncError) -> SyncReport {
        self.abort(format!("authentication rejected: {err}"))
    }

    fn abort(mut self, reason: String) -> SyncReport {
        tracing::error!(stage = ?self.report.state, reason = %reason, "sync run aborted");
        self.enter(RunState::Aborted);
        self.report.abort_reason = Some(reason);
        self.report.summaries.clear();
        self.report.details.clear();
        self.report.merged.rows.clear();
        self.report
    }
}

/// Canonical summary ids, deduplicated, in first-seen order.
fn first_seen_ids(summaries: &[SummaryRecord]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(summaries.len());
    summaries
        .iter()
        .map(|s| canonical_key(&s.id))
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}

/// One detail row per id, in `ids` order. Ids without a successful fetch get
/// the placeholder row.
fn details_in_order(
    ids: &[String],
    outcomes: &mut HashMap<String, FetchOutcome>,
) -> Vec<DetailRecord> {
    ids.iter()
        .map(|id| match outcomes.remove(id) {
            Some(outcome) => outcome.into_record(id),
            None => DetailRecord::placeholder(id),
        })
        .collect()
}
