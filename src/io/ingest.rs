//! CSV ingest.
//!
//! Turns a CSV file into a `Dataset` with one consistent type per column:
//!
//! - a column is `Int` if every non-empty cell parses as `i64`
//! - otherwise `Float` if every non-empty cell parses as a finite `f64`
//! - otherwise `Text`
//!
//! Empty cells become `Null`. Columns listed in `IngestOptions::text_columns`
//! skip inference and stay `Text`, so identifiers such as `0012` keep their
//! leading zeros.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Value};
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Columns read verbatim as text.
    pub text_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Text,
}

/// Load a CSV file into a `Dataset`.
pub fn read_dataset_csv(path: &Path, options: &IngestOptions) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_dataset(file, options)
}

/// Parse CSV from any reader. The first record is the header.
pub fn parse_dataset<R: Read>(input: R, options: &IngestOptions) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns: Vec<String> = headers.iter().map(normalize_header_name).collect();
    ensure_unique_columns(&columns)?;

    let mut records: Vec<StringRecord> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, and the header occupies line 1.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        records.push(record);
    }

    let kinds: Vec<CellKind> = columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            if options.text_columns.contains(name) {
                CellKind::Text
            } else {
                infer_kind(records.iter().filter_map(|r| r.get(col)))
            }
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(&kinds)
                .map(|(raw, kind)| parse_cell(raw, *kind))
                .collect()
        })
        .collect();

    Dataset::from_rows(columns, rows).map_err(|e| AppError::new(2, e.to_string()))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_unique_columns(columns: &[String]) -> Result<(), AppError> {
    for (idx, name) in columns.iter().enumerate() {
        if columns[..idx].contains(name) {
            return Err(AppError::new(2, format!("Duplicate CSV column: `{name}`")));
        }
    }
    Ok(())
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let mut kind = CellKind::Int;
    for s in cells.filter(|s| !s.is_empty()) {
        kind = match kind {
            CellKind::Int if s.parse::<i64>().is_ok() => CellKind::Int,
            CellKind::Int | CellKind::Float if parse_finite_f64(s).is_some() => CellKind::Float,
            _ => return CellKind::Text,
        };
    }
    kind
}

fn parse_cell(raw: &str, kind: CellKind) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let text = || Value::Text(raw.to_string());
    match kind {
        CellKind::Int => raw.parse().map(Value::Int).unwrap_or_else(|_| text()),
        CellKind::Float => parse_finite_f64(raw).map(Value::Float).unwrap_or_else(text),
        CellKind::Text => text(),
    }
}

fn parse_finite_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str, text_columns: &[&str]) -> Dataset {
        let options = IngestOptions {
            text_columns: text_columns.iter().map(|s| s.to_string()).collect(),
        };
        parse_dataset(csv.as_bytes(), &options).unwrap()
    }

    #[test]
    fn infers_one_type_per_column() {
        let data = parse("id,salary,loan,city\nA1,100,150.5,Oslo\nB2,90,80,\n", &[]);

        assert_eq!(data.columns(), &["id", "salary", "loan", "city"]);
        assert_eq!(data.value(0, 0), Some(&Value::from("A1")));
        assert_eq!(data.value(1, 1), Some(&Value::Int(90)));
        // `80` is read as a float because the column holds `150.5`.
        assert_eq!(data.value(1, 2), Some(&Value::Float(80.0)));
        assert_eq!(data.value(1, 3), Some(&Value::Null));
    }

    #[test]
    fn text_columns_skip_inference() {
        let data = parse("id,category\n0012,primary\n", &["id"]);
        assert_eq!(data.value(0, 0), Some(&Value::from("0012")));

        let inferred = parse("id,category\n0012,primary\n", &[]);
        assert_eq!(inferred.value(0, 0), Some(&Value::Int(12)));
    }

    #[test]
    fn non_finite_numbers_stay_text() {
        let data = parse("x\n1.5\ninf\n", &[]);
        assert_eq!(data.value(1, 0), Some(&Value::from("inf")));
    }

    #[test]
    fn strips_bom_and_whitespace_from_headers() {
        let data = parse("\u{feff}id , category\nA1,primary\n", &[]);
        assert_eq!(data.columns(), &["id", "category"]);
    }

    #[test]
    fn ragged_rows_are_rejected_with_line_number() {
        let err = parse_dataset("a,b\n1,2\n3\n".as_bytes(), &IngestOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = parse_dataset("a,a\n1,2\n".as_bytes(), &IngestOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Duplicate CSV column"));
    }
}
