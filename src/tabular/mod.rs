//! Tabular file handling
//!
//! Turns raw spreadsheet or delimited-text bytes into [`TabularData`] and
//! flattens it into the line-oriented block that gets appended to the user
//! prompt. Decoding is a pure transform: either the whole file decodes or an
//! error comes back, never a partial table.

pub mod decode;
pub mod flatten;

pub use decode::decode;
pub use flatten::flatten;

use std::fmt;

use crate::types::{AppError, AppResult};

/// MIME subtype browsers report for `.xlsx` uploads.
pub const SPREADSHEET_MIME_ALIAS: &str = "vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Supported file formats, selected by the declared type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Xlsx,
    Xls,
    Csv,
}

impl FileKind {
    /// Parse a declared type tag, case-insensitively.
    pub fn from_tag(tag: &str) -> AppResult<Self> {
        match tag.to_lowercase().as_str() {
            "xlsx" | SPREADSHEET_MIME_ALIAS => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "csv" => Ok(Self::Csv),
            _ => Err(AppError::UnsupportedType(tag.to_string())),
        }
    }

    /// Infer the kind from a file name or object key extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, extension) = path.rsplit_once('.')?;
        Self::from_tag(extension).ok()
    }
}

/// One scalar cell value.
///
/// Rendering matches what a user sees in the sheet: integer-valued numbers
/// print without a decimal point, booleans as `True`/`False`, empty cells as
/// the literal `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Empty => write!(f, "None"),
        }
    }
}

/// Rows in source order. Rows may have differing lengths; the source formats
/// are permissive and no column-count invariant is enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularData {
    pub rows: Vec<Vec<Cell>>,
}
