#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::ExpenseRecord;

fn make_record(id: i64, date: &str, category: &str, amount: Decimal, note: &str) -> ExpenseRecord {
    ExpenseRecord {
        id,
        date: date.into(),
        category: category.into(),
        amount,
        note: note.into(),
        photo: None,
    }
}

fn sample() -> Vec<ExpenseRecord> {
    vec![
        make_record(1, "2024-02-03", "Food", dec!(10), "Lunch with team"),
        make_record(2, "2024-01-15", "Food", dec!(5), "Coffee"),
        make_record(3, "2024-02-10", "Fuel", dec!(20), "Shell station"),
    ]
}

// ── by_category ───────────────────────────────────────────────

#[test]
fn test_by_category_sums_in_first_seen_order() {
    let totals = by_category(&sample());
    let entries = totals.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("Food".to_string(), dec!(15)));
    assert_eq!(entries[1], ("Fuel".to_string(), dec!(20)));
}

#[test]
fn test_by_category_keeps_insertion_not_alphabetical_order() {
    let records = vec![
        make_record(1, "2024-01-01", "Zoo", dec!(1), ""),
        make_record(2, "2024-01-01", "Apple", dec!(1), ""),
    ];
    let totals = by_category(&records);
    assert_eq!(totals.entries()[0].0, "Zoo");
    assert_eq!(totals.entries()[1].0, "Apple");
}

#[test]
fn test_by_category_empty() {
    let totals = by_category(&[]);
    assert!(totals.is_empty());
    assert_eq!(totals.total(), Decimal::ZERO);
}

// ── by_month ──────────────────────────────────────────────────

#[test]
fn test_by_month_groups_same_month() {
    let records = vec![
        make_record(1, "2024-01-15", "Food", dec!(100), ""),
        make_record(2, "2024-01-20", "Fuel", dec!(100), ""),
    ];
    let totals = by_month(&records);
    assert_eq!(totals.entries().len(), 1);
    assert_eq!(totals.get("2024-01"), Some(dec!(200)));
}

#[test]
fn test_by_month_first_seen_order_not_chronological() {
    let totals = by_month(&sample());
    let months: Vec<&str> = totals.entries().iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(months, ["2024-02", "2024-01"]);
    assert_eq!(totals.get("2024-02"), Some(dec!(30)));
    assert_eq!(totals.total(), dec!(35));
}

#[test]
fn test_by_month_non_iso_date_uses_prefix() {
    let records = vec![
        make_record(1, "15/01/2024", "Food", dec!(1), ""),
        make_record(2, "Jan 5", "Food", dec!(2), ""),
        make_record(3, "", "Food", dec!(3), ""),
    ];
    let totals = by_month(&records);
    assert_eq!(totals.get("15/01/2"), Some(dec!(1)));
    assert_eq!(totals.get("Jan 5"), Some(dec!(2)));
    assert_eq!(totals.get(""), Some(dec!(3)));
}

#[test]
fn test_by_month_multibyte_prefix() {
    let records = vec![make_record(1, "२०२४-०१-१५", "Food", dec!(1), "")];
    let totals = by_month(&records);
    assert_eq!(totals.get("२०२४-०१"), Some(dec!(1)));
}

// ── Charts ────────────────────────────────────────────────────

#[test]
fn test_charts_follow_aggregates() {
    let charts = Charts::build(&sample());
    assert_eq!(charts.category.labels, ["Food", "Fuel"]);
    assert_eq!(charts.category.values, [dec!(15), dec!(20)]);
    assert_eq!(charts.monthly.labels, ["2024-02", "2024-01"]);
    assert_eq!(charts.monthly.values, [dec!(30), dec!(5)]);
}

#[test]
fn test_chart_shares() {
    let charts = Charts::build(&[
        make_record(1, "2024-01-01", "A", dec!(25), ""),
        make_record(2, "2024-01-01", "B", dec!(75), ""),
    ]);
    assert_eq!(charts.category.shares(), [25.0, 75.0]);
}

#[test]
fn test_chart_shares_zero_total() {
    let charts = Charts::build(&[make_record(1, "2024-01-01", "A", Decimal::ZERO, "")]);
    assert_eq!(charts.category.shares(), [0.0]);
    assert!(Charts::build(&[]).monthly.is_empty());
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    let records = [
        make_record(1, "2024-01-01", "Rent", Decimal::MAX, ""),
        make_record(2, "2024-01-02", "Rent", Decimal::MAX, ""),
        make_record(3, "2024-02-01", "Food", Decimal::MAX, ""),
    ];
    let categories = by_category(&records);
    assert_eq!(categories.get("Rent"), Some(Decimal::MAX));
    assert_eq!(categories.total(), Decimal::MAX);
    assert_eq!(by_month(&records).get("2024-01"), Some(Decimal::MAX));

    let charts = Charts::build(&records);
    assert_eq!(charts.category.total(), Decimal::MAX);
    assert_eq!(charts.category.shares(), [100.0, 100.0]);
}

#[test]
fn test_shares_of_very_large_amount() {
    let big = Decimal::from_scientific("1e27").unwrap();
    let charts = Charts::build(&[make_record(1, "2024-01-01", "House", big, "")]);
    assert_eq!(charts.category.shares(), [100.0]);
}

// ── TableView ─────────────────────────────────────────────────

#[test]
fn test_table_rows_in_collection_order() {
    let view = TableView::build(&sample(), &Filter::default(), "₹");
    let ids: Vec<i64> = view.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(view.total_records, 3);
    assert_eq!(view.rows[0].cells[AMOUNT_COLUMN], "₹10.00");
    assert_eq!(view.header.last().map(String::as_str), Some("Actions"));
}

#[test]
fn test_table_position_of() {
    let view = TableView::build(&sample(), &Filter::default(), "$");
    assert_eq!(view.position_of(3), Some(2));
    assert_eq!(view.position_of(99), None);
}

#[test]
fn test_row_text_excludes_actions() {
    let view = TableView::build(&sample(), &Filter::default(), "$");
    let text = view.rows[0].text();
    assert!(text.contains("Lunch with team"));
    assert!(!text.contains("edit"));
}

#[test]
fn test_photo_marker_is_not_searchable() {
    let mut with_photo = make_record(1, "2024-01-01", "Food", dec!(1), "");
    with_photo.photo = Some("data:image/png;base64,AA==".into());
    let records = vec![with_photo, make_record(2, "2024-01-01", "Food", dec!(1), "photo booth")];

    let view = TableView::build(&records, &Filter::default(), "$");
    assert!(view.rows[0].cells[4].contains("[photo]"));

    let filter = Filter {
        query: "photo".into(),
        category: None,
    };
    let view = TableView::build(&records, &filter, "$");
    assert_eq!(view.rows.iter().map(|r| r.id).collect::<Vec<_>>(), [2]);
}

// ── Filter ────────────────────────────────────────────────────

#[test]
fn test_filter_case_insensitive_substring() {
    let records = vec![
        make_record(1, "2024-01-01", "FUEL", dec!(1), ""),
        make_record(2, "2024-01-01", "Food", dec!(1), "fuel stop"),
        make_record(3, "2024-01-01", "Rent", dec!(1), ""),
    ];
    let filter = Filter {
        query: "fuel".into(),
        category: None,
    };
    let view = TableView::build(&records, &filter, "$");
    let ids: Vec<i64> = view.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 2]);
}

#[test]
fn test_filter_empty_query_shows_all() {
    let view = TableView::build(&sample(), &Filter::default(), "$");
    assert_eq!(view.rows.len(), 3);
    assert!(!Filter::default().is_active());
}

#[test]
fn test_filter_matches_rendered_amount() {
    let filter = Filter {
        query: "₹20".into(),
        category: None,
    };
    let view = TableView::build(&sample(), &filter, "₹");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, 3);
}

#[test]
fn test_filter_category_is_exact() {
    let records = vec![
        make_record(1, "2024-01-01", "Food", dec!(1), ""),
        make_record(2, "2024-01-01", "Food & Drink", dec!(1), ""),
        make_record(3, "2024-01-01", "food", dec!(1), ""),
    ];
    let filter = Filter {
        query: String::new(),
        category: Some("Food".into()),
    };
    let view = TableView::build(&records, &filter, "$");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, 1);
    assert_eq!(view.total_records, 3);
}

#[test]
fn test_filter_does_not_touch_records() {
    let records = sample();
    let before = records.clone();
    let filter = Filter {
        query: "nothing matches this".into(),
        category: Some("Fuel".into()),
    };
    let view = TableView::build(&records, &filter, "$");
    assert!(view.rows.is_empty());
    assert_eq!(records, before);
}

#[test]
fn test_filter_describe() {
    let filter = Filter {
        query: "tea".into(),
        category: Some("Food".into()),
    };
    assert_eq!(filter.describe(), "search: 'tea' category: Food");
    assert_eq!(Filter::default().describe(), "");
}

// ── CSV export ────────────────────────────────────────────────

#[test]
fn test_export_strips_currency_from_amount_only() {
    let records = vec![
        make_record(1, "2024-01-15", "Food", dec!(1234.50), "₹ dinner"),
        make_record(2, "2024-01-16", "Fuel", dec!(20), "refill"),
    ];
    let view = TableView::build(&records, &Filter::default(), "₹");
    assert_eq!(view.rows[0].cells[AMOUNT_COLUMN], "₹1,234.50");

    let csv = export_csv(&view).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Date,Category,Amount,Note");
    assert_eq!(lines[1], "2024-01-15,Food,1234.50,₹ dinner");
    assert_eq!(lines[2], "2024-01-16,Fuel,20.00,refill");
}

#[test]
fn test_export_only_displayed_rows() {
    let filter = Filter {
        query: "coffee".into(),
        category: None,
    };
    let view = TableView::build(&sample(), &filter, "$");
    let csv = export_csv(&view).unwrap();
    assert_eq!(csv, "Date,Category,Amount,Note\n2024-01-15,Food,5.00,Coffee\n");
}

#[test]
fn test_export_does_not_quote_commas() {
    let records = vec![make_record(1, "2024-01-15", "Food", dec!(3), "tea, biscuits")];
    let view = TableView::build(&records, &Filter::default(), "$");
    let csv = export_csv(&view).unwrap();
    assert!(csv.contains("2024-01-15,Food,3.00,tea, biscuits\n"));
}

#[test]
fn test_write_csv_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exports");
    let view = TableView::build(&sample(), &Filter::default(), "$");
    let path = write_csv(&view, &out).unwrap();
    assert_eq!(path, out.join(EXPORT_FILE_NAME));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with("Date,Category,Amount,Note\n"));
    assert_eq!(content.lines().count(), 4);
}
