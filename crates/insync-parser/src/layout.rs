//! Layout inference for the monthly attendance sheet
//!
//! The tracker has no fixed coordinates. Everything is found relative to one
//! "identity" column (column B by default):
//!
//! - a full month name somewhere in its first rows gives the reporting month
//! - a cell reading "Employee Name" marks the header row; names follow below
//! - numeric day-of-month values in the header row mark the date columns
//!
//! The year is never read from the sheet. It comes from the reference date
//! (today) unless set explicitly.

use chrono::{Datelike, Local, NaiveDate};
use insync_core::{is_weekday, month_from_name, DateColumn, LayoutError, LayoutInfo, RawGrid};
use tracing::{debug, trace, warn};

/// Column holding the month label, the marker and employee names (column B)
pub const DEFAULT_IDENTITY_COLUMN: usize = 1;

/// Rows of the identity column searched for a month name
pub const DEFAULT_MONTH_SCAN_ROWS: usize = 10;

/// Marker text of the header row, compared case-insensitively
pub const EMPLOYEE_MARKER: &str = "employee name";

/// Layout inference settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatorOptions {
    pub identity_column: usize,
    pub month_scan_rows: usize,
    /// Supplies the fallback month and the year
    pub reference_date: NaiveDate,
    /// Explicit reporting year, overriding the reference date's year
    pub year: Option<i32>,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            identity_column: DEFAULT_IDENTITY_COLUMN,
            month_scan_rows: DEFAULT_MONTH_SCAN_ROWS,
            reference_date: Local::now().date_naive(),
            year: None,
        }
    }
}

impl LocatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity_column(mut self, column: usize) -> Self {
        self.identity_column = column;
        self
    }

    pub fn month_scan_rows(mut self, rows: usize) -> Self {
        self.month_scan_rows = rows;
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Infer month, year, employee start row and date columns
pub fn locate(grid: &RawGrid, options: &LocatorOptions) -> Result<LayoutInfo, LayoutError> {
    let column = options.identity_column;

    let detected = detect_month(grid, column, options.month_scan_rows);
    let month = detected.unwrap_or_else(|| options.reference_date.month());
    let year = options.year.unwrap_or_else(|| options.reference_date.year());
    if detected.is_none() {
        warn!(month, "no month name found in identity column, using current month");
    }

    let employee_start_row = find_employee_start(grid, column)?;
    let header_row = employee_start_row - 1;
    let date_columns = find_date_columns(grid, header_row, year, month);

    debug!(
        month,
        year,
        employee_start_row,
        date_columns = date_columns.len(),
        "located sheet layout"
    );

    Ok(LayoutInfo {
        month,
        year,
        month_detected: detected.is_some(),
        employee_start_row,
        date_columns,
    })
}

/// First full month name among the top `scan_rows` cells of `column`
pub fn detect_month(grid: &RawGrid, column: usize, scan_rows: usize) -> Option<u32> {
    grid.column(column)
        .take(scan_rows)
        .find_map(|(_, cell)| month_from_name(&cell.as_text()))
}

/// Row after the first "employee name" marker in `column`
pub fn find_employee_start(grid: &RawGrid, column: usize) -> Result<usize, LayoutError> {
    grid.column(column)
        .find(|(_, cell)| cell.as_text().trim().to_lowercase() == EMPLOYEE_MARKER)
        .map(|(row, _)| row + 1)
        .ok_or(LayoutError::MissingEmployeeMarker { column })
}

/// Day of month from a header cell: numeric, truncated, within 1..=31
pub fn parse_day(cell: &insync_core::CellValue) -> Option<u32> {
    let day = cell.as_number()?.trunc();
    (1.0..=31.0).contains(&day).then_some(day as u32)
}

/// Header columns holding weekday dates of the month, left to right
pub fn find_date_columns(grid: &RawGrid, header_row: usize, year: i32, month: u32) -> Vec<DateColumn> {
    let mut columns = Vec::new();

    for (column, cell) in grid.row(header_row).iter().enumerate() {
        let Some(day) = parse_day(cell) else {
            if !cell.is_empty() {
                trace!(column, value = %cell.as_text(), "header cell is not a day of month");
            }
            continue;
        };
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            trace!(column, day, "day does not exist in month");
            continue;
        };
        if !is_weekday(date) {
            trace!(column, %date, "skipping weekend column");
            continue;
        }
        columns.push(DateColumn { column, date });
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use insync_core::CellValue;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn options() -> LocatorOptions {
        LocatorOptions::new().reference_date(date(2024, 6, 15))
    }

    /// January 2024 starts on a Monday: 1-5 weekdays, 6-7 weekend.
    fn january_sheet() -> RawGrid {
        RawGrid::new(vec![
            vec![CellValue::Empty, text("Leave Tracker")],
            vec![CellValue::Empty, text("January")],
            vec![],
            vec![
                text("No."),
                text("Employee Name"),
                1.into(),
                2.into(),
                6.into(),
                7.into(),
                8.into(),
            ],
            vec![1.into(), text("Alice"), text("S")],
            vec![2.into(), text("Bob")],
        ])
    }

    #[test]
    fn locates_january_layout() {
        let layout = locate(&january_sheet(), &options()).unwrap();
        assert_eq!(layout.month, 1);
        assert_eq!(layout.year, 2024);
        assert!(layout.month_detected);
        assert_eq!(layout.employee_start_row, 4);
        assert_eq!(layout.header_row(), 3);
        assert_eq!(
            layout.date_columns,
            vec![
                DateColumn { column: 2, date: date(2024, 1, 1) },
                DateColumn { column: 3, date: date(2024, 1, 2) },
                DateColumn { column: 6, date: date(2024, 1, 8) },
            ]
        );
    }

    #[test]
    fn month_falls_back_to_reference_date() {
        let grid = RawGrid::new(vec![
            vec![CellValue::Empty, text("Leave Tracker")],
            vec![CellValue::Empty, text("Employee Name"), 3.into()],
        ]);
        let layout = locate(&grid, &options()).unwrap();
        assert_eq!(layout.month, 6);
        assert_eq!(layout.year, 2024);
        assert!(!layout.month_detected);
        // 2024-06-03 is a Monday
        assert_eq!(layout.date_columns, vec![DateColumn { column: 2, date: date(2024, 6, 3) }]);
    }

    #[test]
    fn explicit_year_overrides_reference() {
        let layout = locate(&january_sheet(), &options().year(2025)).unwrap();
        assert_eq!(layout.year, 2025);
        // 2025-01-01 is a Wednesday, 2025-01-06 a Monday, 2025-01-07 a Tuesday
        let days: Vec<u32> = layout.date_columns.iter().map(|c| c.date.day()).collect();
        assert_eq!(days, vec![1, 2, 6, 7, 8]);
    }

    #[test]
    fn missing_marker_is_a_layout_error() {
        let grid = RawGrid::new(vec![
            vec![CellValue::Empty, text("March")],
            vec![CellValue::Empty, text("Employees")],
            vec![CellValue::Empty, text("Alice")],
        ]);
        let err = locate(&grid, &options()).unwrap_err();
        assert_eq!(err, LayoutError::MissingEmployeeMarker { column: 1 });
    }

    #[test]
    fn marker_in_other_column_does_not_count() {
        let grid = RawGrid::new(vec![vec![text("Employee Name"), text("March")]]);
        assert!(find_employee_start(&grid, 1).is_err());
        assert_eq!(find_employee_start(&grid, 0), Ok(1));
    }

    #[test]
    fn marker_match_is_trimmed_and_case_insensitive() {
        let grid = RawGrid::new(vec![
            vec![CellValue::Empty, text("x")],
            vec![CellValue::Empty, text("  EMPLOYEE name ")],
            vec![CellValue::Empty, text("employee name")],
        ]);
        assert_eq!(find_employee_start(&grid, 1), Ok(2));
    }

    #[test]
    fn month_scan_is_limited_to_top_rows() {
        let mut rows = vec![vec![CellValue::Empty, text("filler")]; 10];
        rows.push(vec![CellValue::Empty, text("April")]);
        let grid = RawGrid::new(rows);
        assert_eq!(detect_month(&grid, 1, 10), None);
        assert_eq!(detect_month(&grid, 1, 11), Some(4));
    }

    #[test]
    fn first_month_name_wins() {
        let grid = RawGrid::new(vec![
            vec![CellValue::Empty, text("Mar")],
            vec![CellValue::Empty, text("MAY")],
            vec![CellValue::Empty, text("June")],
        ]);
        assert_eq!(detect_month(&grid, 1, 10), Some(5));
    }

    #[test]
    fn parse_day_rules() {
        assert_eq!(parse_day(&CellValue::Number(1.0)), Some(1));
        assert_eq!(parse_day(&CellValue::Number(31.9)), Some(31));
        assert_eq!(parse_day(&text(" 12 ")), Some(12));
        assert_eq!(parse_day(&text("7.0")), Some(7));
        assert_eq!(parse_day(&CellValue::Number(0.5)), None);
        assert_eq!(parse_day(&CellValue::Number(32.0)), None);
        assert_eq!(parse_day(&CellValue::Number(-3.0)), None);
        assert_eq!(parse_day(&text("Mon")), None);
        assert_eq!(parse_day(&CellValue::Empty), None);
    }

    #[test]
    fn header_excludes_bad_columns_but_keeps_valid_ones() {
        // February 2023 has 28 days; the 1st is a Wednesday.
        let grid = RawGrid::new(vec![vec![
            text("Employee Name"),
            1.into(),
            text("Total"),
            40.into(),
            4.into(),  // Saturday
            30.into(), // not in February
            text("3"),
        ]]);
        let columns = find_date_columns(&grid, 0, 2023, 2);
        assert_eq!(
            columns,
            vec![
                DateColumn { column: 1, date: date(2023, 2, 1) },
                DateColumn { column: 6, date: date(2023, 2, 3) },
            ]
        );
    }

    #[test]
    fn out_of_order_headers_keep_column_order() {
        let grid = RawGrid::new(vec![vec![text("Employee Name"), 3.into(), 2.into()]]);
        let columns = find_date_columns(&grid, 0, 2024, 1);
        let days: Vec<u32> = columns.iter().map(|c| c.date.day()).collect();
        assert_eq!(days, vec![3, 2]);
    }

    #[test]
    fn custom_identity_column() {
        let grid = RawGrid::new(vec![
            vec![text("October")],
            vec![text("Employee Name"), 1.into()],
            vec![text("Dana"), text("V")],
        ]);
        let layout = locate(&grid, &options().identity_column(0)).unwrap();
        assert_eq!(layout.month, 10);
        assert_eq!(layout.employee_start_row, 2);
        // 2024-10-01 is a Tuesday
        assert_eq!(layout.date_columns, vec![DateColumn { column: 1, date: date(2024, 10, 1) }]);
    }
}
