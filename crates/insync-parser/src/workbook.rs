//! Workbook ingestion
//!
//! Reads the first worksheet of an uploaded tracker into a [`RawGrid`].
//! calamine reports the used range only, so the range offset is padded back
//! in and every cell keeps its absolute sheet coordinate (column B stays
//! column 1 even when column A is blank).

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use insync_core::{CellValue, RawGrid};
use tracing::debug;

use crate::WorkbookError;

/// Read the first worksheet of a workbook file (xlsx, xlsm, xlsb, xls, ods)
pub fn read_workbook(path: &Path) -> Result<RawGrid, WorkbookError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
        path: path.display().to_string(),
        source,
    })?;
    first_sheet(&mut workbook)
}

/// Read the first worksheet of an in-memory workbook, e.g. an upload body
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<RawGrid, WorkbookError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(WorkbookError::Read)?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<RawGrid, WorkbookError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoWorksheet)?
        .map_err(WorkbookError::Sheet)?;
    let grid = grid_from_range(&range);
    debug!(
        rows = grid.height(),
        columns = grid.width(),
        "loaded first worksheet"
    );
    Ok(grid)
}

/// Convert a calamine range into an absolutely addressed grid
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let Some((start_row, start_col)) = range.start() else {
        return RawGrid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    RawGrid::new(rows)
}

/// Map one calamine cell onto the three-way cell model
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
