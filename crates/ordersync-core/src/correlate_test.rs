use rust_decimal::Decimal;

use super::*;

fn summary(id: &str, rel: &str) -> SummaryRecord {
    SummaryRecord {
        id: id.to_string(),
        external_id: format!("ext-{id}"),
        status: "summary-status".to_string(),
        date_created: "2025-04-01T10:00:00".to_string(),
        store_id: "store-1".to_string(),
        channel: "mercadolivre".to_string(),
        total_value: Decimal::new(9990, 2),
        link_rel: rel.to_string(),
        link_type: "GET".to_string(),
        link_href: format!("/orders/{id}"),
    }
}

fn detail(id: &str, status: &str) -> DetailRecord {
    let mut d = DetailRecord::placeholder(id);
    d.status = status.to_string();
    d.sub_status = "ready_to_ship".to_string();
    d.item_quantity = 2;
    d
}

#[test]
fn canonical_key_trims_and_collapses_integral_decimals() {
    assert_eq!(canonical_key(" 123 "), "123");
    assert_eq!(canonical_key("123.0"), "123");
    assert_eq!(canonical_key("123.000"), "123");
    assert_eq!(canonical_key("123.5"), "123.5");
    assert_eq!(canonical_key("abc.0"), "abc.0");
    assert_eq!(canonical_key("MLB-77"), "MLB-77");
    assert_eq!(canonical_key(""), "");
}

#[test]
fn merged_columns_suffix_only_shared_names() {
    let columns = merged_columns();
    assert_eq!(columns[0], "id");
    assert_eq!(columns.iter().filter(|c| c.as_str() == "id").count(), 1);
    assert!(columns.contains(&"status_summary".to_string()));
    assert!(columns.contains(&"status_detail".to_string()));
    assert!(columns.contains(&"totalValue_summary".to_string()));
    assert!(columns.contains(&"totalValue_detail".to_string()));
    assert!(columns.contains(&"linkHref".to_string()));
    assert!(columns.contains(&"subStatus".to_string()));
    assert!(!columns.contains(&"status".to_string()));
    assert_eq!(
        columns.len(),
        SummaryRecord::COLUMNS.len() + DetailRecord::COLUMNS.len() - 1
    );
}

#[test]
fn every_summary_row_yields_exactly_one_merged_row() {
    let summaries = vec![summary("1", "self"), summary("1", "items"), summary("2", "self")];
    let details = vec![detail("1", "paid"), detail("2", "shipped")];

    let merged = correlate(&summaries, &details);

    assert_eq!(merged.len(), summaries.len());
    assert_eq!(merged.get(0, "status_detail"), Some(&Cell::from("paid")));
    assert_eq!(merged.get(1, "status_detail"), Some(&Cell::from("paid")));
    assert_eq!(merged.get(2, "status_detail"), Some(&Cell::from("shipped")));
    assert_eq!(merged.get(1, "linkRel"), Some(&Cell::from("items")));
}

#[test]
fn empty_details_still_yield_one_row_per_summary() {
    let summaries = vec![summary("1", "self"), summary("2", "self")];
    let merged = correlate(&summaries, &[]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get(0, "status_detail"), Some(&Cell::from("")));
    assert_eq!(merged.get(0, "item_quantity"), Some(&Cell::Integer(0)));
    assert_eq!(
        merged.get(0, "totalValue_detail"),
        Some(&Cell::Decimal(Decimal::ZERO))
    );
    assert_eq!(
        merged.get(0, "status_summary"),
        Some(&Cell::from("summary-status"))
    );
}

#[test]
fn empty_summaries_yield_empty_dataset_with_headers() {
    let merged = correlate(&[], &[detail("1", "paid")]);
    assert!(merged.is_empty());
    assert_eq!(merged.columns, merged_columns());
}

#[test]
fn unmatched_details_are_excluded() {
    let summaries = vec![summary("1", "self")];
    let details = vec![detail("99", "paid"), detail("1", "shipped")];
    let merged = correlate(&summaries, &details);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get(0, "id"), Some(&Cell::from("1")));
    assert_eq!(merged.get(0, "status_detail"), Some(&Cell::from("shipped")));
}

#[test]
fn join_key_is_canonicalised_on_both_sides() {
    let summaries = vec![summary(" 123 ", "self")];
    let details = vec![detail("123.0", "paid")];
    let merged = correlate(&summaries, &details);
    assert_eq!(merged.get(0, "id"), Some(&Cell::from("123")));
    assert_eq!(merged.get(0, "status_detail"), Some(&Cell::from("paid")));
}

#[test]
fn duplicate_details_do_not_multiply_rows() {
    let summaries = vec![summary("1", "self")];
    let details = vec![detail("1", "first"), detail("1", "second")];
    let merged = correlate(&summaries, &details);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get(0, "status_detail"), Some(&Cell::from("first")));
}

#[test]
fn every_row_has_a_cell_per_column() {
    let summaries = vec![summary("1", "self"), summary("3", "")];
    let merged = correlate(&summaries, &[detail("1", "paid")]);
    for row in &merged.rows {
        assert_eq!(row.cells.len(), merged.columns.len());
    }
}
