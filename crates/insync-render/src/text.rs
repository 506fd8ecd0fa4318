//! Plain-text calendar renderer for terminal preview

use insync_core::grid::TOTALS_LABEL;
use insync_core::{LeaveReport, RenderError, Renderer};

const COLUMN_GAP: &str = "  ";

/// Aligned plain-text table, one line per working day
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Print the period line above the table
    pub show_title: bool,
    /// Only list days with at least one entry
    pub compact: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_title: true,
            compact: false,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the period line
    pub fn no_title(mut self) -> Self {
        self.show_title = false;
        self
    }

    /// Skip days without entries
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    fn rows(&self, report: &LeaveReport) -> Vec<Vec<String>> {
        let grid = &report.grid;
        let mut rows = Vec::with_capacity(grid.days().len() + 2);

        let mut header = vec!["Date".to_string(), "Weekday".to_string()];
        header.extend(grid.employees().iter().cloned());
        rows.push(header);

        for (row, day) in grid.days().iter().enumerate() {
            let cells: Vec<String> = (0..grid.employees().len())
                .map(|col| grid.cell(row, col).unwrap_or_default().to_string())
                .collect();
            if self.compact && cells.iter().all(String::is_empty) {
                continue;
            }
            let mut line = vec![day.format("%Y-%m-%d").to_string(), day.format("%A").to_string()];
            line.extend(cells);
            rows.push(line);
        }

        let mut totals = vec![TOTALS_LABEL.to_string(), String::new()];
        totals.extend(grid.totals().iter().map(|t| t.to_string()));
        rows.push(totals);

        rows
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.trim_end().to_string()
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &LeaveReport) -> Result<String, RenderError> {
        let rows = self.rows(report);
        let columns = rows.first().map_or(0, Vec::len);

        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                rows.iter()
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        if self.show_title {
            out.push_str(&format!("Leave calendar: {}\n\n", report.period_label()));
        }

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        for (i, row) in rows.iter().enumerate() {
            out.push_str(&format_line(row, &widths));
            out.push('\n');
            if i == 0 {
                out.push_str(&format_line(&separator, &widths));
                out.push('\n');
            }
        }

        Ok(out)
    }
}
