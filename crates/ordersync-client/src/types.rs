//! Request parameters and stage results for the orders API.

use ordersync_core::DetailRecord;
use serde::Serialize;
use serde_json::Value;

/// Query parameters for the paginated listing endpoint. `page` is supplied
/// per request by the page walker; everything else is fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingParams {
    pub date_search_type: String,
    pub enable_link: bool,
    /// Page size; a page with fewer items is the last one.
    pub limit: u32,
    pub status: String,
    pub structure_type: String,
    pub timestamp_from: i64,
    pub timestamp_to: i64,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            date_search_type: "created".to_owned(),
            enable_link: true,
            limit: 50,
            status: "all".to_owned(),
            structure_type: "simple".to_owned(),
            timestamp_from: 1_577_836_800,
            timestamp_to: 1_577_836_800,
        }
    }
}

impl ListingParams {
    /// Query pairs for `page`, in the order the API documents them.
    #[must_use]
    pub fn query_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("dateSearchType", self.date_search_type.clone()),
            ("enableLink", self.enable_link.to_string()),
            ("limit", self.limit.to_string()),
            ("page", page.to_string()),
            ("status", self.status.clone()),
            ("structureType", self.structure_type.clone()),
            ("timestampFrom", self.timestamp_from.to_string()),
            ("timestampTo", self.timestamp_to.to_string()),
        ]
    }
}

/// Why the page walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EmptyPage,
    /// Fewer items than the page size: last page reached.
    ShortPage,
    /// The configured page ceiling was reached before the data ran out.
    PageCeiling,
    /// A non-retryable 4xx response.
    ClientError,
    /// The listing body had no `orders` array or was not JSON.
    Malformed,
    /// A page kept failing transiently; the walk is partial.
    RetriesExhausted,
}

/// Raw listing items accumulated by the page walker.
#[derive(Debug, Clone)]
pub struct PageWalk {
    pub orders: Vec<Value>,
    pub pages_fetched: u32,
    pub stop: StopReason,
    /// `true` when the walk was cut short by retry exhaustion.
    pub partial: bool,
}

/// Result of fetching one order's detail. The pool yields exactly one per
/// dispatched id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(DetailRecord),
    NotFound,
    RetriesExhausted { attempts: u32, last_error: String },
    Malformed { last_error: String },
    /// A non-retryable 4xx other than 404.
    Rejected { last_error: String },
}

impl FetchOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::NotFound => "not_found",
            FetchOutcome::RetriesExhausted { .. } => "retries_exhausted",
            FetchOutcome::Malformed { .. } => "malformed",
            FetchOutcome::Rejected { .. } => "rejected",
        }
    }

    /// The detail row for this outcome, joined under the requested `id`.
    ///
    /// A fetched record takes `id` even when its payload reports another one;
    /// failures become the id-only placeholder.
    #[must_use]
    pub fn into_record(self, id: &str) -> DetailRecord {
        match self {
            FetchOutcome::Success(mut record) => {
                id.clone_into(&mut record.id);
                record
            }
            FetchOutcome::NotFound
            | FetchOutcome::RetriesExhausted { .. }
            | FetchOutcome::Malformed { .. }
            | FetchOutcome::Rejected { .. } => DetailRecord::placeholder(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_follow_documented_order() {
        let params = ListingParams {
            timestamp_to: 1_700_000_000,
            ..ListingParams::default()
        };
        let keys: Vec<&str> = params.query_pairs(3).iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            [
                "dateSearchType",
                "enableLink",
                "limit",
                "page",
                "status",
                "structureType",
                "timestampFrom",
                "timestampTo"
            ]
        );
        let pairs = params.query_pairs(3);
        assert_eq!(pairs[1].1, "true");
        assert_eq!(pairs[3].1, "3");
        assert_eq!(pairs[7].1, "1700000000");
    }

    #[test]
    fn failed_outcomes_become_placeholders() {
        let outcomes = [
            FetchOutcome::NotFound,
            FetchOutcome::RetriesExhausted {
                attempts: 3,
                last_error: "timeout".to_owned(),
            },
            FetchOutcome::Malformed {
                last_error: "no id".to_owned(),
            },
            FetchOutcome::Rejected {
                last_error: "HTTP 422".to_owned(),
            },
        ];
        for outcome in outcomes {
            assert!(!outcome.is_success());
            let record = outcome.into_record("123");
            assert_eq!(record, DetailRecord::placeholder("123"));
        }
    }

    #[test]
    fn success_keeps_fetched_record() {
        let mut record = DetailRecord::placeholder("5");
        record.status = "paid".to_owned();
        let outcome = FetchOutcome::Success(record.clone());
        assert_eq!(outcome.label(), "success");
        assert_eq!(outcome.into_record("5"), record);
    }

    #[test]
    fn success_takes_requested_id() {
        let mut record = DetailRecord::placeholder("555");
        record.sub_status = "delivered".to_owned();
        let joined = FetchOutcome::Success(record).into_record("EXT-9");
        assert_eq!(joined.id, "EXT-9");
        assert_eq!(joined.sub_status, "delivered");
    }
}
