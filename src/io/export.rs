//! Write datasets back to CSV.
//!
//! Floats are written in their `Debug` form (`150.0`, not `150`) so a file
//! written here reads back with the same column types.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Dataset, Value};
use crate::error::AppError;

/// Write a dataset to a CSV file.
pub fn write_dataset_csv(path: &Path, data: &Dataset) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_dataset(file, data)
}

/// Write a dataset as CSV to any writer (header first).
pub fn write_dataset<W: Write>(output: W, data: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(data.columns())
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    for row in data.rows() {
        writer
            .write_record(row.iter().map(Value::to_cell))
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::io::ingest::{IngestOptions, parse_dataset};

    #[test]
    fn writes_header_and_cells() {
        let data = dataset!(["id", "loan"]; ["A1,B", 150.0], ["C2", 7.25]).unwrap();
        let mut buf = Vec::new();
        write_dataset(&mut buf, &data).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "id,loan\n\"A1,B\",150.0\nC2,7.25\n");
    }

    #[test]
    fn written_files_read_back_with_the_same_types() {
        let data = dataset!(
            ["id", "category", "salary", "loan"];
            ["A1", "primary", 100, 150.0],
            ["B2", "secondary", 80, 0.1],
        )
        .unwrap();

        let mut buf = Vec::new();
        write_dataset(&mut buf, &data).unwrap();
        let back = parse_dataset(buf.as_slice(), &IngestOptions::default()).unwrap();
        assert_eq!(back, data);
    }
}
