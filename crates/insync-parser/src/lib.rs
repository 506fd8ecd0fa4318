//! # insync-parser
//!
//! Reads monthly attendance trackers and turns them into leave records.
//!
//! This crate provides:
//! - Workbook ingestion (xlsx, xls, ods) into a `RawGrid`
//! - Layout inference: reporting month, employee list start, date columns
//! - Record extraction through an injected `CodeDictionary`
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use insync_core::{CellValue, CodeDictionary, RawGrid};
//! use insync_parser::{parse_grid, LocatorOptions};
//!
//! let grid = RawGrid::new(vec![
//!     vec![CellValue::Empty, "January".into()],
//!     vec![CellValue::Empty, "Employee Name".into(), 1.into(), 2.into()],
//!     vec![CellValue::Empty, "Alice".into(), "S".into(), CellValue::Empty],
//! ]);
//! let options = LocatorOptions::new().reference_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//!
//! let sheet = parse_grid(&grid, &CodeDictionary::standard(), &options).unwrap();
//! assert_eq!(sheet.layout.month, 1);
//! assert_eq!(sheet.employees, vec!["Alice"]);
//! assert_eq!(sheet.observations[0].label, "Leave: ILL");
//! ```

pub mod extract;
pub mod layout;
pub mod workbook;

pub use extract::{collect_employees, extract_observations};
pub use layout::{locate, LocatorOptions};
pub use workbook::{read_workbook, read_workbook_bytes};

use insync_core::{CodeDictionary, LayoutError, LayoutInfo, Observation, RawGrid};
use thiserror::Error;

/// Workbook could not be read
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Failed to read workbook: {0}")]
    Read(#[source] calamine::Error),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Failed to read worksheet: {0}")]
    Sheet(#[source] calamine::Error),
}

/// Everything the parser learns from one attendance sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSheet {
    pub layout: LayoutInfo,
    pub employees: Vec<String>,
    pub observations: Vec<Observation>,
}

/// Locate the layout, list employees and extract leave records
pub fn parse_grid(
    grid: &RawGrid,
    codes: &CodeDictionary,
    options: &LocatorOptions,
) -> Result<ParsedSheet, LayoutError> {
    let layout = locate(grid, options)?;
    let employees = collect_employees(grid, &layout, options.identity_column);
    let observations = extract_observations(grid, &layout, options.identity_column, codes);

    Ok(ParsedSheet {
        layout,
        employees,
        observations,
    })
}
