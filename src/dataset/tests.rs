use super::*;
use std::path::Path;

fn headers(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn sample_dataset() -> Dataset {
    let mut builder = DatasetBuilder::new(headers(&["Time", "Beam Voltage [V]", "Status"]));
    builder.begin_file(Path::new("run1.csv"));
    builder.push_row(["01/15/2024 02:30:00 PM", "12.5", "OK"]);
    builder.push_row(["01/15/2024 02:30:01 PM", "", "OK"]);
    builder.begin_file(Path::new("run2.csv"));
    builder.push_row(["01/15/2024 02:30:02 PM", "13", "ARC"]);
    builder.finish()
}

// ==================== Builder Tests ====================

#[test]
fn test_builder_infers_column_kinds() {
    let dataset = sample_dataset();

    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.column_count(), 3);
    assert_eq!(dataset.column("Time").unwrap().kind(), ColumnKind::Text);
    assert_eq!(dataset.column("Status").unwrap().kind(), ColumnKind::Text);

    let voltage = dataset.column("Beam Voltage [V]").unwrap();
    assert_eq!(
        voltage.data(),
        &ColumnData::Numeric(vec![Some(12.5), None, Some(13.0)])
    );
}

#[test]
fn test_builder_records_segments() {
    let dataset = sample_dataset();
    let segments = dataset.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].path, Path::new("run1.csv"));
    assert_eq!(segments[0].rows, 0..2);
    assert_eq!(segments[1].rows, 2..3);
    assert_eq!(segments[1].row_count(), 1);
}

#[test]
fn test_empty_file_keeps_empty_segment() {
    let mut builder = DatasetBuilder::new(headers(&["Time"]));
    builder.begin_file(Path::new("empty.csv"));
    let dataset = builder.finish();

    assert_eq!(dataset.row_count(), 0);
    assert_eq!(dataset.segments()[0].rows, 0..0);
    assert_eq!(dataset.column("Time").unwrap().kind(), ColumnKind::Numeric);
}

#[test]
fn test_cell_text() {
    let dataset = sample_dataset();
    let voltage = dataset.column("Beam Voltage [V]").unwrap();
    assert_eq!(voltage.data().cell_text(0).as_deref(), Some("12.5"));
    assert_eq!(voltage.data().cell_text(1).as_deref(), Some(""));
    assert_eq!(voltage.data().cell_text(9), None);
}

// ==================== Rename Tests ====================

#[test]
fn test_default_rename_table_is_valid() {
    RenameTable::default().validate().unwrap();
}

#[test]
fn test_normalize_renames_known_labels() {
    let dataset = normalize_columns(sample_dataset(), &RenameTable::default());

    assert_eq!(
        dataset.headers(),
        headers(&["Time", "Beam Voltage (V)", "Status"])
    );
    // data moves with the label
    assert_eq!(
        dataset.column("Beam Voltage (V)").unwrap().kind(),
        ColumnKind::Numeric
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let table = RenameTable::default();
    let once = normalize_columns(sample_dataset(), &table);
    let twice = normalize_columns(once.clone(), &table);
    assert_eq!(once, twice);
}

#[test]
fn test_rename_skips_when_target_exists() {
    let table = RenameTable::default();
    let input = headers(&["Beam Voltage [V]", "Beam Voltage(V)", "Time"]);

    let renamed = table.apply(&input);
    assert_eq!(
        renamed,
        headers(&["Beam Voltage (V)", "Beam Voltage(V)", "Time"])
    );
    assert_eq!(table.apply(&renamed), renamed);
}

#[test]
fn test_rename_with_empty_table_is_noop() {
    let input = headers(&["Time", "Anything"]);
    assert_eq!(RenameTable::empty().apply(&input), input);
}

#[test]
fn test_validate_rejects_chains() {
    let table = RenameTable::from_pairs([("A", "B"), ("B", "C")]);
    assert!(matches!(
        table.validate(),
        Err(RenameTableError::Chained { .. })
    ));
}

#[test]
fn test_validate_rejects_empty_labels() {
    let table = RenameTable::from_pairs([("", "B")]);
    assert_eq!(table.validate(), Err(RenameTableError::EmptyLabel));
}
