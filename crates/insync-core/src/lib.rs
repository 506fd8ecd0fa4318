//! # insync-core
//!
//! Core domain model and traits for the insync leave calendar reshaper.
//!
//! This crate provides:
//! - Input model: `CellValue`, `RawGrid`
//! - Attendance codes: `CodeDictionary`
//! - Layout and extraction results: `LayoutInfo`, `Observation`
//! - Working-day calendar helpers
//! - Output model: `OutputGrid`, `SheetCell`, `LeaveReport`
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use insync_core::{CodeDictionary, Observation, OutputGrid, Placement};
//!
//! let codes = CodeDictionary::standard();
//! assert_eq!(codes.lookup(" s "), Some("Leave: ILL"));
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut grid = OutputGrid::new(vec!["Alice".into(), "Bob".into()], vec![monday]);
//! let placement = grid.apply(&Observation::new("Alice", monday, "Leave: ILL"));
//!
//! assert_eq!(placement, Placement::Placed);
//! assert_eq!(grid.totals(), vec![1, 0]);
//! ```

pub mod calendar;
pub mod dictionary;
pub mod grid;

pub use calendar::{days_in_month, is_weekday, month_from_name, month_name, working_days};
pub use dictionary::{normalize_code, CodeDictionary, DictionaryError, STANDARD_CODES};
pub use grid::{OutputGrid, Placement, SheetCell};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Raw Input
// ============================================================================

/// A single cell of the uploaded attendance sheet
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell as text (untrimmed).
    ///
    /// Integral numbers render without a fractional part, so a name column
    /// holding employee IDs reads as `1042` rather than `1042.0`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
        }
    }

    /// Numeric view of the cell, accepting numeric text such as `" 7 "` or `"7.0"`
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Empty => return None,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

/// Immutable, rectangular view of one worksheet.
///
/// Addresses are zero-based `(row, column)` pairs in absolute sheet
/// coordinates. Reads outside the used area yield `CellValue::Empty`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl RawGrid {
    /// Build a grid, padding ragged rows with empty cells
    pub fn new(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(row_index, cell)` down one column
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, &CellValue)> + '_ {
        (0..self.height()).map(move |row| (row, self.get(row, col)))
    }
}

// ============================================================================
// Layout & Extraction
// ============================================================================

/// A header column recognised as a working-day date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateColumn {
    pub column: usize,
    pub date: NaiveDate,
}

/// Where the data lives inside a raw attendance sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    /// Reporting month (1-12)
    pub month: u32,
    /// Reporting year
    pub year: i32,
    /// False when the month fell back to the reference date
    pub month_detected: bool,
    /// Row of the first employee name (the row after the "employee name" marker)
    pub employee_start_row: usize,
    /// Weekday date columns in header (left-to-right) order
    pub date_columns: Vec<DateColumn>,
}

impl LayoutInfo {
    /// Row holding the day-of-month headers
    pub fn header_row(&self) -> usize {
        self.employee_start_row.saturating_sub(1)
    }

    pub fn date_for_column(&self, column: usize) -> Option<NaiveDate> {
        self.date_columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.date)
    }

    /// Human-readable reporting period, e.g. "March 2025"
    pub fn period_label(&self) -> String {
        format!("{} {}", month_name(self.month).unwrap_or("Unknown"), self.year)
    }
}

/// One decoded leave entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub employee: String,
    pub date: NaiveDate,
    pub label: String,
}

impl Observation {
    pub fn new(employee: impl Into<String>, date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            employee: employee.into(),
            date,
            label: label.into(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// How the observations of a run were placed into the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PivotStats {
    /// Observations written into an empty cell
    pub placed: usize,
    /// Observations that replaced an earlier value (last write wins)
    pub overwritten: usize,
    /// Observations naming someone outside the employee list
    pub unknown_employee: usize,
    /// Observations dated outside the working-day calendar
    pub unknown_date: usize,
}

impl PivotStats {
    pub fn dropped(&self) -> usize {
        self.unknown_employee + self.unknown_date
    }
}

/// The finished calendar view handed to renderers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaveReport {
    pub layout: LayoutInfo,
    pub grid: OutputGrid,
    pub stats: PivotStats,
}

impl LeaveReport {
    pub fn period_label(&self) -> String {
        self.layout.period_label()
    }

    /// Default output file name, e.g. `insync_output_march_2025.xlsx`
    pub fn suggested_file_name(&self) -> String {
        let month = month_name(self.layout.month).unwrap_or("unknown");
        format!(
            "insync_output_{}_{}.xlsx",
            month.to_lowercase(),
            self.layout.year
        )
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a leave report to the output format
    fn render(&self, report: &LeaveReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// The attendance sheet does not have the expected structure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Could not find an 'Employee Name' header in column {}", marker_column(.column))]
    MissingEmployeeMarker { column: usize },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

fn marker_column(col: &usize) -> String {
    column_label(*col)
}

/// Spreadsheet column letters for a zero-based index (0 -> A, 27 -> AB)
pub fn column_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col;
    loop {
        label.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label
}

// ============================================================================
// Tests
// ============================================================================
