//! Leave record extraction
//!
//! Walks the data region below the header row and decodes every
//! (employee, date column) cell through the code dictionary. Noise around
//! the data region is expected: blank cells, unmapped codes and stray "nan"
//! text are skipped without aborting the walk.

use std::collections::HashSet;

use insync_core::{normalize_code, CodeDictionary, LayoutInfo, Observation, RawGrid};
use tracing::{debug, trace};

/// Missing-value rendering some exporters leave behind, compared after upper-casing
pub const MISSING_VALUE_TEXT: &str = "NAN";

/// Employee names in row order: trimmed, blanks skipped, first occurrence kept
pub fn collect_employees(grid: &RawGrid, layout: &LayoutInfo, identity_column: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut employees = Vec::new();

    for row in layout.employee_start_row..grid.height() {
        let name = grid.get(row, identity_column).as_text().trim().to_string();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            employees.push(name);
        } else {
            debug!(row, name = %name, "employee listed more than once");
        }
    }

    employees
}

/// Decode every mapped leave code in the data region.
///
/// Rows sharing an employee name all contribute; the grid pivot resolves
/// collisions with last-write-wins.
pub fn extract_observations(
    grid: &RawGrid,
    layout: &LayoutInfo,
    identity_column: usize,
    codes: &CodeDictionary,
) -> Vec<Observation> {
    let mut observations = Vec::new();
    let mut unmapped = 0usize;

    for row in layout.employee_start_row..grid.height() {
        let employee = grid.get(row, identity_column).as_text().trim().to_string();

        for date_column in &layout.date_columns {
            let code = normalize_code(&grid.get(row, date_column.column).as_text());
            if code.is_empty() || code == MISSING_VALUE_TEXT {
                continue;
            }
            match codes.lookup(&code) {
                Some(label) => {
                    observations.push(Observation::new(employee.clone(), date_column.date, label));
                }
                None => {
                    unmapped += 1;
                    trace!(row, column = date_column.column, code = %code, "unmapped attendance code");
                }
            }
        }
    }

    debug!(
        observations = observations.len(),
        unmapped,
        "extracted leave records"
    );
    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insync_core::{CellValue, DateColumn};
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn layout() -> LayoutInfo {
        LayoutInfo {
            month: 1,
            year: 2024,
            month_detected: true,
            employee_start_row: 1,
            date_columns: vec![
                DateColumn { column: 2, date: date(2024, 1, 1) },
                DateColumn { column: 3, date: date(2024, 1, 2) },
            ],
        }
    }

    fn sheet() -> RawGrid {
        RawGrid::new(vec![
            vec![CellValue::Empty, text("Employee Name"), 1.into(), 2.into()],
            vec![CellValue::Empty, text(" Alice "), text(" s "), text("xyz")],
            vec![CellValue::Empty, text("Bob"), text("nan"), text("h")],
            vec![],
            vec![CellValue::Empty, text("Carol"), CellValue::Empty, text("V-H")],
        ])
    }

    #[test]
    fn employees_in_row_order() {
        assert_eq!(collect_employees(&sheet(), &layout(), 1), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn duplicate_employee_listed_once() {
        let grid = RawGrid::new(vec![
            vec![text("Employee Name")],
            vec![text("Alice")],
            vec![text("Bob ")],
            vec![text(" Alice")],
            vec![text("   ")],
        ]);
        let layout = LayoutInfo {
            employee_start_row: 1,
            ..layout()
        };
        assert_eq!(collect_employees(&grid, &layout, 0), vec!["Alice", "Bob"]);
    }

    #[test]
    fn numeric_names_render_without_fraction() {
        let grid = RawGrid::new(vec![vec![text("Employee Name")], vec![1042.into()]]);
        assert_eq!(collect_employees(&grid, &layout(), 0), vec!["1042"]);
    }

    #[test]
    fn extracts_mapped_codes_only() {
        let observations = extract_observations(&sheet(), &layout(), 1, &CodeDictionary::standard());
        assert_eq!(
            observations,
            vec![
                Observation::new("Alice", date(2024, 1, 1), "Leave: ILL"),
                Observation::new("Bob", date(2024, 1, 2), "Work From Home"),
                Observation::new("Carol", date(2024, 1, 2), "Leave: V01 Half day"),
            ]
        );
    }

    #[test]
    fn unknown_code_does_not_stop_the_row() {
        let grid = RawGrid::new(vec![
            vec![text("Employee Name"), 1.into(), 2.into()],
            vec![text("Alice"), text("XYZ"), text("C")],
        ]);
        let layout = LayoutInfo {
            date_columns: vec![
                DateColumn { column: 1, date: date(2024, 1, 1) },
                DateColumn { column: 2, date: date(2024, 1, 2) },
            ],
            ..layout()
        };
        let observations = extract_observations(&grid, &layout, 0, &CodeDictionary::standard());
        assert_eq!(
            observations,
            vec![Observation::new("Alice", date(2024, 1, 2), "Leave: Caregiver Leave")]
        );
    }

    #[test]
    fn injected_dictionary_is_used() {
        let codes = CodeDictionary::empty().with("xyz", "Leave: Sabbatical");
        let observations = extract_observations(&sheet(), &layout(), 1, &codes);
        assert_eq!(
            observations,
            vec![Observation::new("Alice", date(2024, 1, 2), "Leave: Sabbatical")]
        );
    }

    #[test]
    fn duplicate_rows_emit_all_observations() {
        let grid = RawGrid::new(vec![
            vec![text("Employee Name"), 1.into()],
            vec![text("Alice"), text("S")],
            vec![text("Alice"), text("V")],
        ]);
        let layout = LayoutInfo {
            date_columns: vec![DateColumn { column: 1, date: date(2024, 1, 1) }],
            ..layout()
        };
        let observations = extract_observations(&grid, &layout, 0, &CodeDictionary::standard());
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[1].label, "Leave: V01");
    }

    #[test]
    fn no_date_columns_means_no_observations() {
        let layout = LayoutInfo {
            date_columns: vec![],
            ..layout()
        };
        assert!(extract_observations(&sheet(), &layout, 1, &CodeDictionary::standard()).is_empty());
    }
}
