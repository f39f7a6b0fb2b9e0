//! Left join of summary rows against detail rows on the order id.
//!
//! Every summary row yields exactly one merged row, in summary order. Columns
//! present on both sides (other than the `id` key) are suffixed with
//! [`SUMMARY_SUFFIX`] and [`DETAIL_SUFFIX`]; all other columns pass through
//! under their own names.

use std::collections::{HashMap, HashSet};

use crate::records::{Cell, DetailRecord, MergedDataset, MergedRecord, SummaryRecord, Tabular};

pub const JOIN_KEY: &str = "id";
pub const SUMMARY_SUFFIX: &str = "_summary";
pub const DETAIL_SUFFIX: &str = "_detail";

/// Canonical string form of an order id used as the join key.
///
/// Trims surrounding whitespace and collapses an integral decimal rendering
/// (`"123.0"`) to its integer form so that ids which went through a float on
/// one side still match.
#[must_use]
pub fn canonical_key(id: &str) -> String {
    let trimmed = id.trim();
    if let Some((int, frac)) = trimmed.split_once('.') {
        let integral = !int.is_empty() && int.bytes().all(|b| b.is_ascii_digit());
        if integral && !frac.is_empty() && frac.bytes().all(|b| b == b'0') {
            return int.to_owned();
        }
    }
    trimmed.to_owned()
}

/// Column headers of the merged dataset: the key, then summary columns, then
/// detail columns, with shared names side-qualified.
#[must_use]
pub fn merged_columns() -> Vec<String> {
    let summary: HashSet<&str> = SummaryRecord::COLUMNS.iter().copied().collect();
    let detail: HashSet<&str> = DetailRecord::COLUMNS.iter().copied().collect();

    let mut columns = vec![JOIN_KEY.to_owned()];
    for &name in SummaryRecord::COLUMNS.iter().filter(|&&c| c != JOIN_KEY) {
        if detail.contains(name) {
            columns.push(format!("{name}{SUMMARY_SUFFIX}"));
        } else {
            columns.push(name.to_owned());
        }
    }
    for &name in DetailRecord::COLUMNS.iter().filter(|&&c| c != JOIN_KEY) {
        if summary.contains(name) {
            columns.push(format!("{name}{DETAIL_SUFFIX}"));
        } else {
            columns.push(name.to_owned());
        }
    }
    columns
}

/// Joins `summaries` (driving side) with `details` on the canonical id.
///
/// Unmatched summaries receive the placeholder's empty/zero detail columns.
/// Details without a matching summary are left out of the merged view. When
/// several details share an id the first one wins, so no summary row is ever
/// duplicated.
#[must_use]
pub fn correlate(summaries: &[SummaryRecord], details: &[DetailRecord]) -> MergedDataset {
    let mut by_id: HashMap<String, &DetailRecord> = HashMap::with_capacity(details.len());
    for detail in details {
        let key = canonical_key(&detail.id);
        if by_id.contains_key(&key) {
            tracing::debug!(order_id = %key, "duplicate detail row ignored for join");
            continue;
        }
        by_id.insert(key, detail);
    }

    let columns = merged_columns();
    let mut rows = Vec::with_capacity(summaries.len());
    let mut matched = 0usize;

    for summary in summaries {
        let key = canonical_key(&summary.id);
        let detail_cells = match by_id.get(&key) {
            Some(detail) => {
                matched += 1;
                detail.cells()
            }
            None => DetailRecord::placeholder(&key).cells(),
        };

        let mut cells = Vec::with_capacity(columns.len());
        cells.push(Cell::Text(key));
        cells.extend(summary.cells().into_iter().skip(1));
        cells.extend(detail_cells.into_iter().skip(1));
        rows.push(MergedRecord { cells });
    }

    tracing::info!(
        summaries = summaries.len(),
        details = details.len(),
        matched,
        unmatched = summaries.len() - matched,
        "correlation complete"
    );

    MergedDataset { columns, rows }
}

#[cfg(test)]
#[path = "correlate_test.rs"]
mod tests;
