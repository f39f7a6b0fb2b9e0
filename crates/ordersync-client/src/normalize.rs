//! Flattening of raw order JSON into [`SummaryRecord`] and [`DetailRecord`] rows.
//!
//! All field access goes through [`crate::extract`], so missing or oddly typed
//! values become empty strings or zeros instead of errors.

use ordersync_core::{DetailRecord, SummaryRecord};
use serde_json::Value;

use crate::extract::{decimal, first, get, integer, text};

const SELF_REL: &str = "self";
const ORDERS_PATH: &str = "/orders/";

/// Resolves the correlation id of a listing item.
///
/// Tried in order: the `id` field, then `externalId`, then the id embedded in
/// a `rel = "self"` link's `href`. Returns `None` when none yields a
/// non-blank value.
#[must_use]
pub fn resolve_summary_id(raw: &Value) -> Option<String> {
    let non_blank = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };

    non_blank(text(raw, &["id"]))
        .or_else(|| non_blank(text(raw, &["externalId"])))
        .or_else(|| {
            raw.get("links")?
                .as_array()?
                .iter()
                .filter(|link| text(link, &["rel"]) == SELF_REL)
                .find_map(|link| self_link_id(&text(link, &["href"])))
        })
}

/// Extracts the order id from a self link such as `/orders/123` or
/// `https://host/v1/orders/123/`.
#[must_use]
pub fn self_link_id(href: &str) -> Option<String> {
    let (_, tail) = href.rsplit_once(ORDERS_PATH)?;
    let path = tail.split(['?', '#']).next().unwrap_or_default();
    let id = path.trim_end_matches('/');
    (!id.is_empty() && !id.contains('/')).then(|| id.to_owned())
}

/// Normalizes one listing item into one row per link entry.
///
/// An item with no usable links still yields exactly one row with empty link
/// columns. An item whose id cannot be resolved yields no rows and a warning.
#[must_use]
pub fn normalize_summary(raw: &Value) -> Vec<SummaryRecord> {
    if !raw.is_object() {
        tracing::warn!(kind = json_kind(raw), "listing item is not an object; skipping");
        return Vec::new();
    }

    let Some(id) = resolve_summary_id(raw) else {
        tracing::warn!(
            external_id = %text(raw, &["externalId"]),
            "listing item has no resolvable id; skipping"
        );
        return Vec::new();
    };

    let base = SummaryRecord {
        id,
        external_id: text(raw, &["externalId"]),
        status: text(raw, &["status"]),
        date_created: text(raw, &["dateCreated"]),
        store_id: text(raw, &["storeId"]),
        channel: text(raw, &["channel"]),
        total_value: decimal(raw, &["totalValue"]),
        link_rel: String::new(),
        link_type: String::new(),
        link_href: String::new(),
    };

    let links: Vec<&Value> = raw
        .get("links")
        .and_then(Value::as_array)
        .map(|links| links.iter().filter(|l| l.is_object()).collect())
        .unwrap_or_default();

    if links.is_empty() {
        return vec![base];
    }

    links
        .into_iter()
        .map(|link| SummaryRecord {
            link_rel: text(link, &["rel"]),
            link_type: text(link, &["type"]),
            link_href: text(link, &["href"]),
            ..base.clone()
        })
        .collect()
}

/// Normalizes every listing item. Returns the rows and the number of items
/// dropped for lack of a resolvable id.
#[must_use]
pub fn normalize_summaries(raws: &[Value]) -> (Vec<SummaryRecord>, usize) {
    let mut rows = Vec::with_capacity(raws.len());
    let mut dropped = 0usize;
    for raw in raws {
        let normalized = normalize_summary(raw);
        if normalized.is_empty() {
            dropped += 1;
        }
        rows.extend(normalized);
    }
    if dropped > 0 {
        tracing::warn!(dropped, total = raws.len(), "listing items dropped during normalization");
    }
    tracing::info!(items = raws.len(), rows = rows.len(), "summary rows normalized");
    (rows, dropped)
}

/// Flattens a full order object into a [`DetailRecord`].
///
/// Only the first element of `payments` and of `order_items` is read; later
/// entries are ignored.
#[must_use]
pub fn normalize_detail(raw: &Value) -> DetailRecord {
    let address = get(raw, &["shipping", "receiverAddress"], &Value::Null);
    let payment = first(raw, "payments");
    let item = first(raw, "order_items");

    DetailRecord {
        id: text(raw, &["id"]).trim().to_owned(),
        external_id: text(raw, &["externalId"]),
        status: text(raw, &["status"]),
        sub_status: text(raw, &["subStatus"]),
        date_created: text(raw, &["dateCreated"]),
        date_last_updated: text(raw, &["dateLastUpdated"]),
        total_value: decimal(raw, &["totalValue"]),
        total_weight: decimal(raw, &["totalWeight"]),
        store_id: text(raw, &["storeId"]),
        channel: text(raw, &["channel"]),
        channel_name: text(raw, &["channelName"]),
        buyer_first_name: text(raw, &["buyer", "first_name"]),
        buyer_last_name: text(raw, &["buyer", "last_name"]),
        buyer_full_name: text(raw, &["buyer", "full_name"]),
        buyer_email: text(raw, &["buyer", "email"]),
        buyer_phone_number: text(raw, &["buyer", "phone", "number"]),
        buyer_alternative_phone_number: text(raw, &["buyer", "alternative_phone", "number"]),
        shipping_street: text(address, &["street"]),
        shipping_number: text(address, &["number"]),
        shipping_city: text(address, &["city"]),
        shipping_state: text(address, &["state"]),
        shipping_zipcode: text(address, &["zipcode"]),
        shipping_cost: decimal(raw, &["shipping", "cost"]),
        shipping_type: text(raw, &["shipping", "logistic_type"]),
        shipping_tracking: text(raw, &["shipping", "logistic", "logisticId"]),
        payment_status: text(payment, &["status"]),
        payment_type: text(payment, &["payment_type"]),
        payment_installments: integer(payment, &["installments"]),
        payment_amount: decimal(payment, &["transaction_amount"]),
        item_title: text(item, &["item", "title"]),
        item_sku: text(item, &["item", "seller_custom_field"]),
        item_quantity: integer(item, &["quantity"]),
        item_price: decimal(item, &["unit_price"]),
        item_cost: decimal(item, &["cost"]),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
