//! Integration tests reading real workbook files

use chrono::NaiveDate;
use insync_core::{CellValue, CodeDictionary, Observation};
use insync_parser::{parse_grid, read_workbook, read_workbook_bytes, LocatorOptions};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A March tracker laid out like the HR export: title rows, month label in
/// column B, day numbers on the "Employee Name" row, codes below.
fn march_tracker() -> Workbook {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 1, "Leave Tracker").unwrap();
    sheet.write_string(1, 1, "MARCH").unwrap();
    sheet.write_string(3, 0, "S.No").unwrap();
    sheet.write_string(3, 1, "Employee Name").unwrap();
    for day in 1..=10u16 {
        sheet.write_number(3, 1 + day, f64::from(day)).unwrap();
    }

    let rows: [(&str, [&str; 10]); 3] = [
        ("Alice", ["S", "", "", "", "V", "", "", "", "", ""]),
        ("Bob", ["", "h", "", "", "", "", "", "", "", "xyz"]),
        ("Carol", ["", "", "", "", "", "", "", "c-h", "", ""]),
    ];
    for (i, (name, codes)) in rows.iter().enumerate() {
        let row = 4 + i as u32;
        sheet.write_number(row, 0, (i + 1) as f64).unwrap();
        sheet.write_string(row, 1, *name).unwrap();
        for (offset, code) in codes.iter().enumerate() {
            if !code.is_empty() {
                sheet.write_string(row, 2 + offset as u16, *code).unwrap();
            }
        }
    }

    workbook
}

fn options() -> LocatorOptions {
    LocatorOptions::new().reference_date(date(2025, 7, 20))
}

#[test]
fn read_file_keeps_absolute_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.xlsx");
    march_tracker().save(&path).unwrap();

    let grid = read_workbook(&path).unwrap();
    assert_eq!(grid.get(1, 1), &CellValue::Text("MARCH".into()));
    assert_eq!(grid.get(3, 1), &CellValue::Text("Employee Name".into()));
    assert_eq!(grid.get(3, 2), &CellValue::Number(1.0));
    assert_eq!(grid.get(4, 1), &CellValue::Text("Alice".into()));
}

#[test]
fn parse_march_tracker_from_bytes() {
    let bytes = march_tracker().save_to_buffer().unwrap();
    let grid = read_workbook_bytes(&bytes).unwrap();

    let sheet = parse_grid(&grid, &CodeDictionary::standard(), &options()).unwrap();

    assert_eq!(sheet.layout.month, 3);
    assert_eq!(sheet.layout.year, 2025);
    assert!(sheet.layout.month_detected);
    assert_eq!(sheet.layout.employee_start_row, 4);

    // March 2025: 1-2 and 8-9 fall on weekends
    let days: Vec<u32> = sheet
        .layout
        .date_columns
        .iter()
        .map(|c| chrono::Datelike::day(&c.date))
        .collect();
    assert_eq!(days, vec![3, 4, 5, 6, 7, 10]);

    assert_eq!(sheet.employees, vec!["Alice", "Bob", "Carol"]);

    // Alice's "S" sits on Saturday the 1st and Carol's "c-h" on Saturday the 8th,
    // so both are ignored; Bob's "xyz" is unmapped.
    assert_eq!(
        sheet.observations,
        vec![Observation::new("Alice", date(2025, 3, 5), "Leave: V01")]
    );
}

#[test]
fn parse_with_explicit_year() {
    let bytes = march_tracker().save_to_buffer().unwrap();
    let grid = read_workbook_bytes(&bytes).unwrap();

    let sheet = parse_grid(&grid, &CodeDictionary::standard(), &options().year(2024)).unwrap();

    // March 2024: the 2nd-3rd and 9th-10th are weekends, the 8th a Friday
    assert_eq!(sheet.layout.year, 2024);
    assert_eq!(
        sheet.observations,
        vec![
            Observation::new("Alice", date(2024, 3, 1), "Leave: ILL"),
            Observation::new("Alice", date(2024, 3, 5), "Leave: V01"),
            Observation::new("Carol", date(2024, 3, 8), "Leave: Caregiver Half day"),
        ]
    );
}
