//! CSV chunk writer
//!
//! One header row (`time` plus signal names in table order), one line per
//! table row. Missing markers serialize as empty fields.

use crate::table::SignalTable;
use crate::types::{ConverterError, Result};
use std::path::Path;

/// Write one chunk of a table as a CSV file
pub fn write_chunk(chunk: &SignalTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| ConverterError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    writer
        .write_record(chunk.header())
        .map_err(|e| ConverterError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    let columns: Vec<&[Option<f64>]> = chunk.signal_columns().map(|(_, col)| col).collect();
    for (row, &timestamp) in chunk.time().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(timestamp.to_string());
        for column in &columns {
            record.push(match column[row] {
                Some(value) => value.to_string(),
                None => String::new(),
            });
        }
        writer
            .write_record(&record)
            .map_err(|e| ConverterError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    }

    writer
        .flush()
        .map_err(ConverterError::IoError)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SignalTableBuilder;
    use crate::types::DecodedSignalSet;

    #[test]
    fn test_csv_content_with_missing_marker() {
        let mut builder = SignalTableBuilder::new();
        builder.reset();
        let mut a = DecodedSignalSet::new();
        a.insert("A".to_string(), 1.0);
        builder.update(0.0, &a);
        a.insert("A".to_string(), 2.0);
        builder.update(0.5, &a);
        let mut b = DecodedSignalSet::new();
        b.insert("B".to_string(), 5.0);
        builder.update(1.0, &b);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.csv");
        write_chunk(&builder.finalize(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "time,A,B");
        assert_eq!(lines[1], "0,2,0");
        assert_eq!(lines[2], "0.5,2,0");
        // A's column ends one row early; the missing marker is an empty field.
        assert_eq!(lines[3], "1,,5");
    }
}
