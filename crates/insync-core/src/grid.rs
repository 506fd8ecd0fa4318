//! Calendar-view output grid
//!
//! One row per working day, one column per employee. The grid knows its own
//! placement rules; `to_sheet` lays it out as the dense table the renderers
//! write:
//!
//! ```text
//!  row 3 |   |   | DATE DETAILS |       |     |         |               |
//!  row 4 |   |   | Year | Month | Day | Type    | Date          | Alice | Bob
//!  row 5 |   |   | 2024 | January | 1 | Monday | 2024-01-01  | Leave: ILL |
//!  ...
//!  last  |   |   |      |       |     |         | Total Entries | 1     | 0
//! ```

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::Observation;

/// Row of the "DATE DETAILS" band label
pub const HEADER_BAND_ROW: usize = 3;
/// Row of the column labels and employee names
pub const COLUMN_LABEL_ROW: usize = 4;
/// First working-day row
pub const FIRST_DATA_ROW: usize = 5;
/// First date-detail column (Year)
pub const DATE_DETAILS_COL: usize = 2;
/// Column of the concrete date; also holds the totals label
pub const DATE_COL: usize = 6;
/// First employee column
pub const FIRST_EMPLOYEE_COL: usize = 7;

pub const DATE_DETAILS_LABEL: &str = "DATE DETAILS";
pub const DATE_COLUMN_LABELS: [&str; 5] = ["Year", "Month", "Day", "Type", "Date"];
pub const TOTALS_LABEL: &str = "Total Entries";

/// Outcome of replaying one observation into the grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Written into an empty cell
    Placed,
    /// Replaced an earlier value
    Overwrote { previous: String },
    /// Employee not in the employee list; dropped
    UnknownEmployee,
    /// Date not a working day of the month; dropped
    UnknownDate,
}

/// One cell of the laid-out output table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SheetCell {
    Empty,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    /// Count of non-blank leave cells in this employee column
    Total(usize),
}

/// Dense employee-by-working-day grid of leave labels
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputGrid {
    employees: Vec<String>,
    days: Vec<NaiveDate>,
    /// `cells[day][employee]`
    cells: Vec<Vec<Option<String>>>,
}

impl OutputGrid {
    /// An empty grid for the given employees and working days
    pub fn new(employees: Vec<String>, days: Vec<NaiveDate>) -> Self {
        let cells = vec![vec![None; employees.len()]; days.len()];
        Self {
            employees,
            days,
            cells,
        }
    }

    pub fn employees(&self) -> &[String] {
        &self.employees
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Label at `(day row, employee column)`
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col)?.as_deref()
    }

    /// Column of an employee (exact, case-sensitive match)
    pub fn column_of(&self, employee: &str) -> Option<usize> {
        self.employees.iter().position(|e| e == employee)
    }

    pub fn row_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| *d == date)
    }

    /// Write an observation into its cell; the last write wins
    pub fn apply(&mut self, observation: &Observation) -> Placement {
        let Some(col) = self.column_of(&observation.employee) else {
            return Placement::UnknownEmployee;
        };
        let Some(row) = self.row_of(observation.date) else {
            return Placement::UnknownDate;
        };

        match self.cells[row][col].replace(observation.label.clone()) {
            Some(previous) => Placement::Overwrote { previous },
            None => Placement::Placed,
        }
    }

    /// Per-employee count of populated cells, in employee order
    pub fn totals(&self) -> Vec<usize> {
        (0..self.employees.len())
            .map(|col| {
                self.cells
                    .iter()
                    .filter(|row| row[col].as_deref().is_some_and(|l| !l.is_empty()))
                    .count()
            })
            .collect()
    }

    pub fn total_for(&self, employee: &str) -> Option<usize> {
        let col = self.column_of(employee)?;
        self.totals().get(col).copied()
    }

    /// Number of populated cells across the whole grid
    pub fn populated_cells(&self) -> usize {
        self.totals().iter().sum()
    }

    /// Row of the totals line in the laid-out table
    pub fn totals_row(&self) -> usize {
        FIRST_DATA_ROW + self.days.len()
    }

    pub fn sheet_height(&self) -> usize {
        self.totals_row() + 1
    }

    pub fn sheet_width(&self) -> usize {
        FIRST_EMPLOYEE_COL + self.employees.len()
    }

    /// Lay the grid out as the dense output table
    pub fn to_sheet(&self) -> Vec<Vec<SheetCell>> {
        let mut sheet = vec![vec![SheetCell::Empty; self.sheet_width()]; self.sheet_height()];

        sheet[HEADER_BAND_ROW][DATE_DETAILS_COL] = SheetCell::Text(DATE_DETAILS_LABEL.into());
        for (i, label) in DATE_COLUMN_LABELS.iter().enumerate() {
            sheet[COLUMN_LABEL_ROW][DATE_DETAILS_COL + i] = SheetCell::Text((*label).into());
        }
        for (i, name) in self.employees.iter().enumerate() {
            sheet[COLUMN_LABEL_ROW][FIRST_EMPLOYEE_COL + i] = SheetCell::Text(name.clone());
        }

        for (i, date) in self.days.iter().enumerate() {
            let row = &mut sheet[FIRST_DATA_ROW + i];
            row[DATE_DETAILS_COL] = SheetCell::Integer(i64::from(date.year()));
            row[DATE_DETAILS_COL + 1] = SheetCell::Text(date.format("%B").to_string());
            row[DATE_DETAILS_COL + 2] = SheetCell::Integer(i64::from(date.day()));
            row[DATE_DETAILS_COL + 3] = SheetCell::Text(date.format("%A").to_string());
            row[DATE_COL] = SheetCell::Date(*date);

            for (col, label) in self.cells[i].iter().enumerate() {
                if let Some(label) = label {
                    row[FIRST_EMPLOYEE_COL + col] = SheetCell::Text(label.clone());
                }
            }
        }

        let totals_row = self.totals_row();
        sheet[totals_row][DATE_COL] = SheetCell::Text(TOTALS_LABEL.into());
        for (col, total) in self.totals().into_iter().enumerate() {
            sheet[totals_row][FIRST_EMPLOYEE_COL + col] = SheetCell::Total(total);
        }

        sheet
    }
}
