//! Byte-level decoding for the supported tabular formats.
//!
//! Spreadsheets go through `calamine` (first worksheet only, cached cell
//! values, no formula evaluation); delimited text goes through the `csv`
//! crate with standard quoting.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use tracing::debug;

use super::{Cell, FileKind, TabularData};
use crate::types::{AppError, AppResult};

/// Decode raw bytes into rows of scalar cells.
pub fn decode(bytes: &[u8], kind: FileKind) -> AppResult<TabularData> {
    let data = match kind {
        FileKind::Xlsx => decode_xlsx(bytes)?,
        FileKind::Xls => decode_xls(bytes)?,
        FileKind::Csv => decode_csv(bytes)?,
    };
    debug!(kind = ?kind, rows = data.rows.len(), "Decoded tabular file");
    Ok(data)
}

fn decode_xlsx(bytes: &[u8]) -> AppResult<TabularData> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::Decode(format!("failed to open xlsx workbook: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Decode("workbook has no worksheets".to_string()))?
        .map_err(|e| AppError::Decode(format!("failed to read worksheet: {}", e)))?;
    Ok(collect_rows(&range))
}

fn decode_xls(bytes: &[u8]) -> AppResult<TabularData> {
    let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
        .map_err(|e| AppError::Decode(format!("failed to open xls workbook: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Decode("workbook has no worksheets".to_string()))?
        .map_err(|e| AppError::Decode(format!("failed to read worksheet: {}", e)))?;
    Ok(collect_rows(&range))
}

fn collect_rows(range: &Range<Data>) -> TabularData {
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    TabularData { rows }
}

fn cell_value(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

fn decode_csv(bytes: &[u8]) -> AppResult<TabularData> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AppError::Encoding(format!("csv bytes are not valid UTF-8: {}", e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::Decode(format!("failed to parse csv record: {}", e)))?;
        rows.push(
            record
                .iter()
                .map(|field| Cell::Text(field.to_string()))
                .collect(),
        );
    }
    Ok(TabularData { rows })
}
