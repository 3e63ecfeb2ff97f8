//! Row flattening
//!
//! One source row per line, values joined by `", "`. Embedded separators in
//! values are not escaped; the output is prompt text, not a data format.

use super::TabularData;

/// Render decoded rows as one deterministic multi-line text block.
pub fn flatten(data: &TabularData) -> String {
    data.rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::{decode, Cell, FileKind};

    #[test]
    fn test_csv_round_trip() {
        let data = decode(b"a,b\n1,2", FileKind::Csv).unwrap();
        assert_eq!(flatten(&data), "a, b\n1, 2");
    }

    #[test]
    fn test_scalar_rendering_in_rows() {
        let data = TabularData {
            rows: vec![
                vec![
                    Cell::Text("Name".to_string()),
                    Cell::Text("Age".to_string()),
                    Cell::Text("Active".to_string()),
                ],
                vec![
                    Cell::Text("Alice".to_string()),
                    Cell::Number(30.0),
                    Cell::Bool(true),
                ],
                vec![Cell::Text("Bob".to_string()), Cell::Empty, Cell::Bool(false)],
            ],
        };
        assert_eq!(
            flatten(&data),
            "Name, Age, Active\nAlice, 30, True\nBob, None, False"
        );
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let data = decode(b"x,y\n1.5,2", FileKind::Csv).unwrap();
        assert_eq!(flatten(&data), flatten(&data));
    }

    #[test]
    fn test_empty_table_flattens_to_empty_string() {
        assert_eq!(flatten(&TabularData::default()), "");
    }
}
