//! Behavioural tests for the table model, validation, and extraction working together.

use sextant_table::{
    CellValue, NumericSeries, Record, Table, TableError, ValidationIssue, extract, extract_paired,
    numeric_columns, validate,
};

fn monthly(n: u32) -> Table {
    Table::from_records(
        (1..=n)
            .map(|m| {
                Record::new()
                    .with("ds", format!("2024-{m:02}-01"))
                    .with("revenue", f64::from(m) * 10.0)
                    .with("churn", if m % 2 == 0 { None } else { Some(f64::from(m)) })
            })
            .collect(),
    )
    .with_timestamp_column("ds")
}

#[test]
fn custom_timestamp_column_is_honoured_everywhere() {
    let table = monthly(6);
    assert!(validate(&table).is_valid());
    assert_eq!(numeric_columns(&table), ["churn", "revenue"]);
    assert_eq!(table.timestamp_labels().last().as_deref(), Some("2024-06-01"));

    // Under the default name the same records have no timestamps.
    let default = Table::from_records(table.records().to_vec());
    assert_eq!(
        validate(&default).issues(),
        &[ValidationIssue::MissingTimestampColumn]
    );
}

#[test]
fn extraction_skips_gaps_and_keeps_order() {
    let table = monthly(6);
    assert_eq!(extract(&table, "churn").as_slice(), &[1.0, 3.0, 5.0]);
    assert_eq!(extract(&table, "revenue").len(), 6);
    assert!(extract(&table, "absent").is_empty());
}

#[test]
fn paired_extraction_keeps_shared_rows_only() {
    let table = monthly(6);
    let (churn, revenue) = extract_paired(&table, "churn", "revenue");
    assert_eq!(churn.as_slice(), &[1.0, 3.0, 5.0]);
    assert_eq!(revenue.as_slice(), &[10.0, 30.0, 50.0]);
}

#[test]
fn numeric_strings_and_non_finite_numbers_are_not_values() {
    let table = Table::from_records(vec![
        Record::new()
            .with("Date", "2024-01-01")
            .with("a", "42")
            .with("b", f64::NAN)
            .with("c", 1.0),
        Record::new()
            .with("Date", "2024-02-01")
            .with("a", "43")
            .with("b", 2.0)
            .with("c", f64::INFINITY),
    ]);
    // `b` holds a number (NaN) in the first record, so it is a numeric column,
    // but the NaN itself is never extracted.
    assert_eq!(numeric_columns(&table), ["b", "c"]);
    assert_eq!(extract(&table, "a").as_slice(), &[] as &[f64]);
    assert_eq!(extract(&table, "b").as_slice(), &[2.0]);
    assert_eq!(extract(&table, "c").as_slice(), &[1.0]);
}

#[test]
fn explicit_columns_are_checked() {
    let records = vec![Record::new().with("Date", "d").with("x", 1.0)];
    let result = Table::new(vec!["Date".into()], records);
    assert!(matches!(
        result,
        Err(TableError::UnknownColumn { row_index: 0, ref column }) if column == "x"
    ));

    let result = Table::new(vec!["x".into(), "x".into()], Vec::new());
    assert!(matches!(result, Err(TableError::DuplicateColumn { .. })));
}

#[test]
fn head_previews_leading_records() {
    let table = monthly(12);
    let preview = table.head(10);
    assert_eq!(preview.len(), 10);
    assert_eq!(preview[0].label("ds"), Some("2024-01-01"));
    assert_eq!(monthly(3).head(10).len(), 3);
    assert_eq!(monthly(3).preview(10).len(), 3);
}

#[test]
fn spreadsheet_serial_dates_validate_like_labels() {
    let rows = |dates: &[f64]| {
        Table::from_records(
            dates
                .iter()
                .map(|&d| Record::new().with("Date", d).with("units", 5.0))
                .collect(),
        )
    };
    assert!(validate(&rows(&[45292.0, 45323.0, 45352.0])).is_valid());
    assert_eq!(
        validate(&rows(&[45292.0, 45292.0])).issues(),
        &[ValidationIssue::DuplicateTimestamps { label: "45292".into() }]
    );
}

#[test]
fn series_rejects_non_finite_values() {
    assert!(NumericSeries::new(vec![1.0, f64::NAN]).is_err());
    assert!(NumericSeries::try_from(vec![1.0, 2.0]).is_ok());
}

#[test]
fn absent_and_null_cells_behave_alike() {
    let record = Record::new().with("a", None::<f64>);
    assert_eq!(record.get("a"), Some(&CellValue::Null));
    assert_eq!(record.number("a"), None);
    assert_eq!(record.number("b"), None);
}
