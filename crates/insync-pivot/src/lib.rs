//! # insync-pivot
//!
//! Reshapes extracted leave records into the working-day calendar view.
//!
//! This crate provides:
//! - The grid pivot: observations replayed into an employee-by-day grid
//! - The end-to-end pipeline from a raw sheet to a [`LeaveReport`]
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use insync_core::{working_days, Observation};
//! use insync_pivot::pivot;
//!
//! let days = working_days(2024, 1);
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let observations = vec![Observation::new("Alice", monday, "Leave: ILL")];
//!
//! let result = pivot(vec!["Alice".into(), "Bob".into()], days, &observations).unwrap();
//! assert_eq!(result.grid.totals(), vec![1, 0]);
//! assert_eq!(result.stats.placed, 1);
//! ```

pub mod pipeline;

pub use pipeline::{run, Outcome, NO_RECORDS_MESSAGE};

use chrono::NaiveDate;
use insync_core::{LayoutInfo, LeaveReport, Observation, OutputGrid, PivotStats, Placement};
use tracing::{debug, warn};

/// A filled grid together with placement statistics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PivotResult {
    pub grid: OutputGrid,
    pub stats: PivotStats,
}

impl PivotResult {
    /// Attach the layout the grid was derived from
    pub fn into_report(self, layout: LayoutInfo) -> LeaveReport {
        LeaveReport {
            layout,
            grid: self.grid,
            stats: self.stats,
        }
    }
}

/// Replay observations into a fresh grid, in order.
///
/// Returns `None` when there is nothing to place. Observations for unknown
/// employees or non-working days are dropped; a later observation for an
/// already filled cell replaces the earlier label.
pub fn pivot(
    employees: Vec<String>,
    days: Vec<NaiveDate>,
    observations: &[Observation],
) -> Option<PivotResult> {
    if observations.is_empty() {
        return None;
    }

    let mut grid = OutputGrid::new(employees, days);
    let mut stats = PivotStats::default();

    for observation in observations {
        match grid.apply(observation) {
            Placement::Placed => stats.placed += 1,
            Placement::Overwrote { previous } => {
                stats.overwritten += 1;
                warn!(
                    employee = %observation.employee,
                    date = %observation.date,
                    previous = %previous,
                    label = %observation.label,
                    "conflicting leave entries, keeping the later one"
                );
            }
            Placement::UnknownEmployee => {
                stats.unknown_employee += 1;
                debug!(employee = %observation.employee, "observation for unlisted employee dropped");
            }
            Placement::UnknownDate => {
                stats.unknown_date += 1;
                debug!(date = %observation.date, "observation outside working days dropped");
            }
        }
    }

    debug!(
        placed = stats.placed,
        overwritten = stats.overwritten,
        dropped = stats.dropped(),
        "pivoted observations"
    );
    Some(PivotResult { grid, stats })
}
