//! JSON calendar renderer

use insync_core::{LeaveReport, PivotStats, RenderError, Renderer};
use serde::Serialize;

/// Machine-readable calendar: one entry per working day, cells in employee order
#[derive(Clone, Debug)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

#[derive(Serialize)]
struct CalendarView<'a> {
    period: String,
    month: u32,
    year: i32,
    month_detected: bool,
    employees: &'a [String],
    days: Vec<DayView<'a>>,
    totals: Vec<usize>,
    stats: PivotStats,
}

#[derive(Serialize)]
struct DayView<'a> {
    date: String,
    weekday: String,
    entries: Vec<Option<&'a str>>,
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, report: &LeaveReport) -> Result<String, RenderError> {
        let grid = &report.grid;
        let days = grid
            .days()
            .iter()
            .enumerate()
            .map(|(row, day)| DayView {
                date: day.format("%Y-%m-%d").to_string(),
                weekday: day.format("%A").to_string(),
                entries: (0..grid.employees().len()).map(|col| grid.cell(row, col)).collect(),
            })
            .collect();

        let view = CalendarView {
            period: report.period_label(),
            month: report.layout.month,
            year: report.layout.year,
            month_detected: report.layout.month_detected,
            employees: grid.employees(),
            days,
            totals: grid.totals(),
            stats: report.stats,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        };
        json.map_err(|e| RenderError::Format(e.to_string()))
    }
}
