use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single value in one of the exported datasets.
///
/// There is no null cell: absent data is [`Cell::Text`] with an empty string
/// or a numeric zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Decimal(value)
    }
}

/// Fixed-schema row: a static column list plus the matching cells.
pub trait Tabular {
    /// Column names, in output order. The join key `id` is always first.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Cells in the same order as [`Self::COLUMNS`].
    fn cells(&self) -> Vec<Cell>;
}

/// One row of the listing dataset: an order summary fanned out per link entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub id: String,
    pub external_id: String,
    pub status: String,
    pub date_created: String,
    pub store_id: String,
    pub channel: String,
    pub total_value: Decimal,
    pub link_rel: String,
    pub link_type: String,
    pub link_href: String,
}

impl Tabular for SummaryRecord {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "externalId",
        "status",
        "dateCreated",
        "storeId",
        "channel",
        "totalValue",
        "linkRel",
        "linkType",
        "linkHref",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.id.as_str()),
            Cell::from(self.external_id.as_str()),
            Cell::from(self.status.as_str()),
            Cell::from(self.date_created.as_str()),
            Cell::from(self.store_id.as_str()),
            Cell::from(self.channel.as_str()),
            Cell::from(self.total_value),
            Cell::from(self.link_rel.as_str()),
            Cell::from(self.link_type.as_str()),
            Cell::from(self.link_href.as_str()),
        ]
    }
}

/// One row of the detail dataset, flattened from a full order object.
///
/// Only the first payment and the first line item are represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub id: String,
    #[serde(rename = "externalId")]
    pub external_id: String,
    pub status: String,
    #[serde(rename = "subStatus")]
    pub sub_status: String,
    #[serde(rename = "dateCreated")]
    pub date_created: String,
    #[serde(rename = "dateLastUpdated")]
    pub date_last_updated: String,
    #[serde(rename = "totalValue")]
    pub total_value: Decimal,
    #[serde(rename = "totalWeight")]
    pub total_weight: Decimal,
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub channel: String,
    #[serde(rename = "channelName")]
    pub channel_name: String,
    pub buyer_first_name: String,
    pub buyer_last_name: String,
    pub buyer_full_name: String,
    pub buyer_email: String,
    pub buyer_phone_number: String,
    pub buyer_alternative_phone_number: String,
    pub shipping_street: String,
    pub shipping_number: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zipcode: String,
    pub shipping_cost: Decimal,
    pub shipping_type: String,
    pub shipping_tracking: String,
    pub payment_status: String,
    pub payment_type: String,
    pub payment_installments: i64,
    pub payment_amount: Decimal,
    pub item_title: String,
    pub item_sku: String,
    pub item_quantity: i64,
    pub item_price: Decimal,
    pub item_cost: Decimal,
}

impl DetailRecord {
    /// Id-only record used wherever detail retrieval failed, so every failure
    /// path yields the same schema with empty/zero columns.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            external_id: String::new(),
            status: String::new(),
            sub_status: String::new(),
            date_created: String::new(),
            date_last_updated: String::new(),
            total_value: Decimal::ZERO,
            total_weight: Decimal::ZERO,
            store_id: String::new(),
            channel: String::new(),
            channel_name: String::new(),
            buyer_first_name: String::new(),
            buyer_last_name: String::new(),
            buyer_full_name: String::new(),
            buyer_email: String::new(),
            buyer_phone_number: String::new(),
            buyer_alternative_phone_number: String::new(),
            shipping_street: String::new(),
            shipping_number: String::new(),
            shipping_city: String::new(),
            shipping_state: String::new(),
            shipping_zipcode: String::new(),
            shipping_cost: Decimal::ZERO,
            shipping_type: String::new(),
            shipping_tracking: String::new(),
            payment_status: String::new(),
            payment_type: String::new(),
            payment_installments: 0,
            payment_amount: Decimal::ZERO,
            item_title: String::new(),
            item_sku: String::new(),
            item_quantity: 0,
            item_price: Decimal::ZERO,
            item_cost: Decimal::ZERO,
        }
    }

    /// Returns `true` when every column other than `id` holds its default.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder(&self.id)
    }
}

impl Tabular for DetailRecord {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "externalId",
        "status",
        "subStatus",
        "dateCreated",
        "dateLastUpdated",
        "totalValue",
        "totalWeight",
        "storeId",
        "channel",
        "channelName",
        "buyer_first_name",
        "buyer_last_name",
        "buyer_full_name",
        "buyer_email",
        "buyer_phone_number",
        "buyer_alternative_phone_number",
        "shipping_street",
        "shipping_number",
        "shipping_city",
        "shipping_state",
        "shipping_zipcode",
        "shipping_cost",
        "shipping_type",
        "shipping_tracking",
        "payment_status",
        "payment_type",
        "payment_installments",
        "payment_amount",
        "item_title",
        "item_sku",
        "item_quantity",
        "item_price",
        "item_cost",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.id.as_str()),
            Cell::from(self.external_id.as_str()),
            Cell::from(self.status.as_str()),
            Cell::from(self.sub_status.as_str()),
            Cell::from(self.date_created.as_str()),
            Cell::from(self.date_last_updated.as_str()),
            Cell::from(self.total_value),
            Cell::from(self.total_weight),
            Cell::from(self.store_id.as_str()),
            Cell::from(self.channel.as_str()),
            Cell::from(self.channel_name.as_str()),
            Cell::from(self.buyer_first_name.as_str()),
            Cell::from(self.buyer_last_name.as_str()),
            Cell::from(self.buyer_full_name.as_str()),
            Cell::from(self.buyer_email.as_str()),
            Cell::from(self.buyer_phone_number.as_str()),
            Cell::from(self.buyer_alternative_phone_number.as_str()),
            Cell::from(self.shipping_street.as_str()),
            Cell::from(self.shipping_number.as_str()),
            Cell::from(self.shipping_city.as_str()),
            Cell::from(self.shipping_state.as_str()),
            Cell::from(self.shipping_zipcode.as_str()),
            Cell::from(self.shipping_cost),
            Cell::from(self.shipping_type.as_str()),
            Cell::from(self.shipping_tracking.as_str()),
            Cell::from(self.payment_status.as_str()),
            Cell::from(self.payment_type.as_str()),
            Cell::from(self.payment_installments),
            Cell::from(self.payment_amount),
            Cell::from(self.item_title.as_str()),
            Cell::from(self.item_sku.as_str()),
            Cell::from(self.item_quantity),
            Cell::from(self.item_price),
            Cell::from(self.item_cost),
        ]
    }
}

/// One joined row; cells line up with [`MergedDataset::columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub cells: Vec<Cell>,
}

/// The correlated dataset handed to export: one row per summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDataset {
    pub columns: Vec<String>,
    pub rows: Vec<MergedRecord>,
}

impl MergedDataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a cell by row index and column name.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.cells.get(col)
    }
}

/// Serializes as a sequence of `{column: cell}` objects in column order.
impl Serialize for MergedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                cells: &row.cells,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}
