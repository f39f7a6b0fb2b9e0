//! Sequential listing walk for `OrdersClient`.

use std::time::Duration;

use crate::error::{ErrorKind, SyncError};
use crate::types::{ListingParams, PageWalk, StopReason};

use super::OrdersClient;

impl OrdersClient {
    /// Walks listing pages from page 1 until the data runs out.
    ///
    /// Stops on an empty page, on a page shorter than `params.limit`, when
    /// the next page would exceed `max_pages`, or on a non-retryable client
    /// or payload error. A page whose retries are exhausted ends the walk
    /// with `partial = true`; everything collected before it is kept.
    ///
    /// `page_delay` is applied before every page except the first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthorized`] on 401/403. Every other failure
    /// ends the walk and is reported through [`PageWalk::stop`].
    pub async fn fetch_all_orders(
        &self,
        endpoint: &str,
        params: &ListingParams,
        max_pages: u32,
        page_delay: Duration,
    ) -> Result<PageWalk, SyncError> {
        let limit = usize::try_from(params.limit).unwrap_or(usize::MAX);
        let mut orders = Vec::new();
        let mut pages_fetched = 0u32;
        let mut partial = false;
        let mut page = 0u32;

        let stop = loop {
            page += 1;
            if page > max_pages {
                tracing::warn!(max_pages, total = orders.len(), "page ceiling reached");
                break StopReason::PageCeiling;
            }

            if page > 1 && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }

            let items = match self.fetch_orders_page(endpoint, params, page).await {
                Ok(items) => items,
                Err(err) => match err.kind() {
                    ErrorKind::Auth => {
                        tracing::error!(page, error = %err, "authentication rejected during page walk");
                        return Err(err);
                    }
                    ErrorKind::RetriesExhausted => {
                        tracing::error!(
                            page,
                            total = orders.len(),
                            error = %err,
                            "page retries exhausted; keeping partial listing"
                        );
                        partial = true;
                        break StopReason::RetriesExhausted;
                    }
                    ErrorKind::Malformed => {
                        tracing::error!(page, error = %err, "malformed listing page; stopping walk");
                        break StopReason::Malformed;
                    }
                    ErrorKind::Client | ErrorKind::Transient => {
                        tracing::error!(page, error = %err, "listing page rejected; stopping walk");
                        break StopReason::ClientError;
                    }
                },
            };

            pages_fetched += 1;
            let count = items.len();
            orders.extend(items);
            tracing::info!(page, count, total = orders.len(), "page fetched");

            if count == 0 {
                break StopReason::EmptyPage;
            }
            if count < limit {
                break StopReason::ShortPage;
            }
        };

        tracing::info!(
            ?stop,
            pages_fetched,
            total = orders.len(),
            partial,
            "page walk finished"
        );

        Ok(PageWalk {
            orders,
            pages_fetched,
            stop,
            partial,
        })
    }
}
