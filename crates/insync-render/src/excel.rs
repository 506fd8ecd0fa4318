//! Excel calendar renderer
//!
//! Writes the laid-out calendar table into a single-sheet XLSX workbook:
//!
//! ```text
//! |   |   | DATE DETAILS |          |     |         |               |            |
//! |   |   | Year         | Month    | Day | Type    | Date          | Alice      | Bob
//! |   |   | 2025         | March    | 3   | Monday  | 2025-03-03    | Leave: ILL |
//! |   |   | ...          |          |     |         |               |            |
//! |   |   |              |          |     |         | Total Entries | =COUNTA(…) | =COUNTA(…)
//! ```
//!
//! ## Highlighting
//!
//! Every employee column carries "text contains" conditional formats over the
//! data and totals rows. The defaults colour sick leave, vacation and working
//! from home; the rules stay live when the workbook is edited afterwards.
//!
//! ## Totals
//!
//! By default the totals row holds `COUNTA` formulas with the computed count
//! stored as the cached result, so viewers that do not recalculate still show
//! the right number. `static_values()` writes plain numbers instead.

use chrono::{Datelike, NaiveDate};
use insync_core::grid::{COLUMN_LABEL_ROW, DATE_DETAILS_COL, FIRST_DATA_ROW, FIRST_EMPLOYEE_COL};
use insync_core::{column_label, LeaveReport, RenderError, Renderer, SheetCell};
use rust_xlsxwriter::{
    ConditionalFormatText, ConditionalFormatTextRule, ExcelDateTime, Format, FormatAlign,
    FormatBorder, Formula, Workbook, Worksheet,
};

/// Background colour applied to cells containing a piece of text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightRule {
    pub contains: String,
    /// RGB colour, e.g. `0xFFC7CE`
    pub color: u32,
}

impl HighlightRule {
    pub fn new(contains: impl Into<String>, color: u32) -> Self {
        Self {
            contains: contains.into(),
            color,
        }
    }
}

/// Excel calendar renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Whether totals are `COUNTA` formulas (vs static values)
    pub use_formulas: bool,
    /// Whether to freeze the header rows and date columns
    pub freeze_panes: bool,
    /// Conditional highlight rules, applied in order
    pub highlights: Vec<HighlightRule>,
    /// Height of every written row
    pub row_height: f64,
    /// Height of the column label row
    pub header_row_height: f64,
    /// Width of each employee column
    pub employee_column_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".into(),
            use_formulas: true,
            freeze_panes: true,
            highlights: vec![
                HighlightRule::new("ILL", 0xFFC7CE),
                HighlightRule::new("V01", 0xC6EFCE),
                HighlightRule::new("Work From Home", 0xBDD7EE),
            ],
            row_height: 22.0,
            header_row_height: 26.0,
            employee_column_width: 22.0,
        }
    }
}

/// Widths of the date detail columns C..G
const DATE_DETAIL_WIDTHS: [f64; 5] = [10.0, 12.0, 6.0, 15.0, 18.0];

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Use static values instead of formulas
    pub fn static_values(mut self) -> Self {
        self.use_formulas = false;
        self
    }

    /// Do not freeze panes
    pub fn no_freeze(mut self) -> Self {
        self.freeze_panes = false;
        self
    }

    /// Add a highlight rule after the existing ones
    pub fn highlight(mut self, contains: impl Into<String>, color: u32) -> Self {
        self.highlights.push(HighlightRule::new(contains, color));
        self
    }

    /// Drop all highlight rules, including the defaults
    pub fn no_highlights(mut self) -> Self {
        self.highlights.clear();
        self
    }

    /// Set width of employee columns
    pub fn employee_column_width(mut self, width: f64) -> Self {
        self.employee_column_width = width;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &LeaveReport) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = Self::create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_table(sheet, report, &formats)?;
        self.set_dimensions(sheet, report)?;
        self.add_highlights(sheet, report)?;

        if self.freeze_panes {
            sheet
                .set_freeze_panes(FIRST_DATA_ROW as u32, FIRST_EMPLOYEE_COL as u16)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Create reusable formats
    fn create_formats() -> ExcelFormats {
        let cell = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let header = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        let date = Format::new()
            .set_num_format("yyyy-mm-dd")
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        let total = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        ExcelFormats {
            cell,
            header,
            date,
            total,
        }
    }

    /// Write every cell of the laid-out table
    fn write_table(
        &self,
        sheet: &mut Worksheet,
        report: &LeaveReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let last_data_row = FIRST_DATA_ROW + report.grid.days().len();

        for (row, cells) in report.grid.to_sheet().iter().enumerate() {
            let row_num = row as u32;
            let base = if row == COLUMN_LABEL_ROW {
                &formats.header
            } else {
                &formats.cell
            };

            for (col, value) in cells.iter().enumerate() {
                let col_num = col as u16;
                match value {
                    // Outside the table area cells stay unformatted
                    SheetCell::Empty if row < COLUMN_LABEL_ROW || col < DATE_DETAILS_COL => {}
                    SheetCell::Empty => {
                        sheet
                            .write_blank(row_num, col_num, base)
                            .map_err(|e| RenderError::Format(e.to_string()))?;
                    }
                    SheetCell::Text(text) => {
                        sheet
                            .write_string_with_format(row_num, col_num, text, base)
                            .map_err(|e| RenderError::Format(e.to_string()))?;
                    }
                    SheetCell::Integer(n) => {
                        sheet
                            .write_number_with_format(row_num, col_num, *n as f64, base)
                            .map_err(|e| RenderError::Format(e.to_string()))?;
                    }
                    SheetCell::Date(date) => {
                        let datetime = excel_date(*date)?;
                        sheet
                            .write_datetime_with_format(row_num, col_num, &datetime, &formats.date)
                            .map_err(|e| RenderError::Format(e.to_string()))?;
                    }
                    SheetCell::Total(count) => {
                        if self.use_formulas {
                            let letter = column_label(col);
                            let formula = Formula::new(format!(
                                "=COUNTA({letter}{}:{letter}{last_data_row})",
                                FIRST_DATA_ROW + 1
                            ))
                            .set_result(count.to_string());
                            sheet
                                .write_formula_with_format(row_num, col_num, formula, &formats.total)
                                .map_err(|e| RenderError::Format(e.to_string()))?;
                        } else {
                            sheet
                                .write_number_with_format(row_num, col_num, *count as f64, &formats.total)
                                .map_err(|e| RenderError::Format(e.to_string()))?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Column widths and row heights
    fn set_dimensions(&self, sheet: &mut Worksheet, report: &LeaveReport) -> Result<(), RenderError> {
        for (i, width) in DATE_DETAIL_WIDTHS.iter().enumerate() {
            sheet
                .set_column_width((DATE_DETAILS_COL + i) as u16, *width)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        for i in 0..report.grid.employees().len() {
            sheet
                .set_column_width((FIRST_EMPLOYEE_COL + i) as u16, self.employee_column_width)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        for row in 0..report.grid.sheet_height() {
            let height = if row == COLUMN_LABEL_ROW {
                self.header_row_height
            } else {
                self.row_height
            };
            sheet
                .set_row_height(row as u32, height)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        Ok(())
    }

    /// Conditional "text contains" fills per employee column, data and totals rows
    fn add_highlights(&self, sheet: &mut Worksheet, report: &LeaveReport) -> Result<(), RenderError> {
        let employees = report.grid.employees().len();
        if employees == 0 {
            return Ok(());
        }
        let first_row = FIRST_DATA_ROW as u32;
        let last_row = report.grid.totals_row() as u32;

        for rule in &self.highlights {
            let fill = Format::new()
                .set_background_color(rule.color)
                .set_border(FormatBorder::Thin);
            let conditional_format = ConditionalFormatText::new()
                .set_rule(ConditionalFormatTextRule::Contains(rule.contains.clone()))
                .set_format(fill);

            for i in 0..employees {
                let col = (FIRST_EMPLOYEE_COL + i) as u16;
                sheet
                    .add_conditional_format(first_row, col, last_row, col, &conditional_format)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        Ok(())
    }
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, RenderError> {
    let year = u16::try_from(date.year())
        .map_err(|_| RenderError::InvalidData(format!("Year out of range: {}", date.year())))?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)
        .map_err(|e| RenderError::InvalidData(format!("Invalid date {date}: {e}")))
}

/// Reusable cell formats
struct ExcelFormats {
    cell: Format,
    header: Format,
    date: Format,
    total: Format,
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &LeaveReport) -> Result<Vec<u8>, RenderError> {
        if report.grid.days().is_empty() {
            return Err(RenderError::InvalidData("No working days to render".into()));
        }
        self.render_to_bytes(report)
    }
}
