//! Chunked table persistence (CSV, MAT)
//!
//! Splits a finalized table into size-bounded row chunks and writes each
//! chunk in the format selected by the output extension. Chunk `n`
//! (1-indexed) goes to `<base>_part<n><ext>`.

use crate::table::SignalTable;
use crate::types::{ConverterError, Result};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod mat;

/// Supported tabular output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Tabular text: header row, one row per line
    Csv,
    /// Binary scientific-array container: one named array per column
    Mat,
}

impl TableFormat {
    /// Select the format from an output path's extension.
    ///
    /// Fails with [`ConverterError::UnsupportedFormat`] for anything other
    /// than `.csv` or `.mat` (case-insensitive); no file is created in that
    /// case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("mat") => Ok(TableFormat::Mat),
            Some(other) => Err(ConverterError::UnsupportedFormat(other.to_string())),
            None => Err(ConverterError::UnsupportedFormat(format!("{:?}", path))),
        }
    }
}

/// Write a table to `output` in chunks of at most `chunk_size` rows.
///
/// Produces `ceil(rows / chunk_size)` files (none for an empty table) and
/// returns their paths in order. Concatenating the chunks row by row
/// reproduces the table exactly.
pub fn write_table(table: &SignalTable, output: &Path, chunk_size: usize) -> Result<Vec<PathBuf>> {
    let format = TableFormat::from_path(output)?;
    let chunk_size = chunk_size.max(1);

    let total = table.row_count();
    let num_chunks = (total + chunk_size - 1) / chunk_size;
    let mut paths = Vec::with_capacity(num_chunks);

    for index in 0..num_chunks {
        let start = index * chunk_size;
        let end = (start + chunk_size).min(total);
        let chunk = table.slice_rows(start, end);
        let path = chunk_path(output, index + 1);

        match format {
            TableFormat::Csv => csv::write_chunk(&chunk, &path)?,
            TableFormat::Mat => mat::write_chunk(&chunk, &path)?,
        }

        log::info!("Saved {:?} ({} rows)", path, chunk.row_count());
        paths.push(path);
    }

    Ok(paths)
}

/// Derive the path of chunk `n` by inserting `_part<n>` before the extension
fn chunk_path(output: &Path, n: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = output.extension().and_then(|s| s.to_str()).unwrap_or("");
    output.with_file_name(format!("{}_part{}.{}", stem, n, extension))
}
