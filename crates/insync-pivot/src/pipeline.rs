//! Raw sheet to calendar report

use insync_core::{working_days, CodeDictionary, LayoutError, LayoutInfo, LeaveReport, RawGrid};
use insync_parser::{parse_grid, LocatorOptions};
use tracing::{debug, info};

use crate::pivot;

/// User-facing notice when a sheet holds no mapped leave codes
pub const NO_RECORDS_MESSAGE: &str = "No mapped leave records found.";

/// Result of a successful pipeline run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The calendar view, ready for rendering
    Report(LeaveReport),
    /// The sheet parsed but contained no mapped leave codes
    NoRecords { layout: LayoutInfo },
}

impl Outcome {
    pub fn layout(&self) -> &LayoutInfo {
        match self {
            Outcome::Report(report) => &report.layout,
            Outcome::NoRecords { layout } => layout,
        }
    }

    pub fn report(&self) -> Option<&LeaveReport> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::NoRecords { .. } => None,
        }
    }
}

/// Locate, extract and pivot one attendance sheet.
///
/// The only failure is a sheet without an "Employee Name" marker; a sheet
/// without any mapped codes is a normal [`Outcome::NoRecords`].
pub fn run(
    grid: &RawGrid,
    codes: &CodeDictionary,
    options: &LocatorOptions,
) -> Result<Outcome, LayoutError> {
    let sheet = parse_grid(grid, codes, options)?;
    info!(period = %sheet.layout.period_label(), "month detected");

    let days = working_days(sheet.layout.year, sheet.layout.month);
    match pivot(sheet.employees, days, &sheet.observations) {
        Some(result) => Ok(Outcome::Report(result.into_report(sheet.layout))),
        None => {
            debug!("no mapped leave codes in sheet");
            Ok(Outcome::NoRecords {
                layout: sheet.layout,
            })
        }
    }
}
