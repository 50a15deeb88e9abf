//! MAT (Level 5) chunk writer
//!
//! Emits a little-endian Level 5 MAT-file with one named n-by-1 double
//! array per table column, `time` included. Missing markers serialize as
//! NaN so every array stays purely numeric.
//!
//! Layout per variable: a miMATRIX element holding array flags
//! (mxDOUBLE_CLASS), dimensions, the array name, and the real part. All
//! subelements are padded to 8-byte boundaries.

use crate::table::SignalTable;
use crate::types::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// MAT-file data types
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_INT8: u32 = 1;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

// Array class for double-precision arrays
const MX_DOUBLE_CLASS: u32 = 6;

const HEADER_TEXT_LEN: usize = 116;

/// Write one chunk of a table as a Level 5 MAT-file
pub fn write_chunk(chunk: &SignalTable, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_header(&mut writer)?;

    let time: Vec<f64> = chunk.time().to_vec();
    write_array(&mut writer, "time", &time)?;

    for (name, column) in chunk.signal_columns() {
        let values: Vec<f64> = column.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        write_array(&mut writer, name, &values)?;
    }

    writer.flush()?;
    Ok(())
}

/// 128-byte file header: descriptive text, subsystem offset, version, endian tag
fn write_header<W: Write>(writer: &mut W) -> Result<()> {
    let text = format!(
        "MATLAB 5.0 MAT-file, created by can-table-decoder on {}",
        chrono::Utc::now().format("%a %b %d %H:%M:%S %Y")
    );
    let mut header = [b' '; HEADER_TEXT_LEN];
    let len = text.len().min(HEADER_TEXT_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;

    // Subsystem data offset: none
    writer.write_all(&[0u8; 8])?;
    // Version 0x0100, endian indicator "IM" for little-endian files
    writer.write_u16::<LittleEndian>(0x0100)?;
    writer.write_all(b"IM")?;
    Ok(())
}

/// One miMATRIX element: an n-by-1 double column vector named `name`
fn write_array<W: Write>(writer: &mut W, name: &str, values: &[f64]) -> Result<()> {
    let name_bytes = name.as_bytes();
    let name_padded = padded_len(name_bytes.len());
    let data_bytes = values.len() * 8;

    // Subelement sizes: flags, dimensions, name, real part (tag + payload)
    let total = (8 + 8) + (8 + 8) + (8 + name_padded) + (8 + data_bytes);

    writer.write_u32::<LittleEndian>(MI_MATRIX)?;
    writer.write_u32::<LittleEndian>(total as u32)?;

    // Array flags
    writer.write_u32::<LittleEndian>(MI_UINT32)?;
    writer.write_u32::<LittleEndian>(8)?;
    writer.write_u32::<LittleEndian>(MX_DOUBLE_CLASS)?;
    writer.write_u32::<LittleEndian>(0)?;

    // Dimensions: n rows, 1 column
    writer.write_u32::<LittleEndian>(MI_INT32)?;
    writer.write_u32::<LittleEndian>(8)?;
    writer.write_i32::<LittleEndian>(values.len() as i32)?;
    writer.write_i32::<LittleEndian>(1)?;

    // Array name, padded to an 8-byte boundary
    writer.write_u32::<LittleEndian>(MI_INT8)?;
    writer.write_u32::<LittleEndian>(name_bytes.len() as u32)?;
    writer.write_all(name_bytes)?;
    for _ in name_bytes.len()..name_padded {
        writer.write_u8(0)?;
    }

    // Real part
    writer.write_u32::<LittleEndian>(MI_DOUBLE)?;
    writer.write_u32::<LittleEndian>(data_bytes as u32)?;
    for &value in values {
        writer.write_f64::<LittleEndian>(value)?;
    }

    Ok(())
}

/// Round a byte length up to the next multiple of 8
fn padded_len(len: usize) -> usize {
    (len + 7) & !7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SignalTableBuilder;
    use crate::types::DecodedSignalSet;
    use byteorder::{ByteOrder, LittleEndian};

    fn two_signal_table() -> SignalTable {
        let mut builder = SignalTableBuilder::new();
        builder.reset();
        builder.update(0.0, &DecodedSignalSet::new());
        let mut signals = DecodedSignalSet::new();
        signals.insert("A".to_string(), 1.5);
        signals.insert("B".to_string(), -2.0);
        builder.update(0.1, &signals);
        builder.update(0.2, &signals);
        builder.finalize()
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 8);
        assert_eq!(padded_len(8), 8);
        assert_eq!(padded_len(9), 16);
    }

    #[test]
    fn test_mat_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.mat");
        write_chunk(&two_signal_table(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
        assert_eq!(&bytes[126..128], b"IM");
        assert_eq!(LittleEndian::read_u16(&bytes[124..126]), 0x0100);

        // First element after the header is the time matrix
        assert_eq!(LittleEndian::read_u32(&bytes[128..132]), MI_MATRIX);
        let time_size = LittleEndian::read_u32(&bytes[132..136]) as usize;
        // flags + dims + padded 4-char name + 3 doubles
        assert_eq!(time_size, 16 + 16 + 16 + 8 + 24);

        // Three variables in total: time, A, B; each element accounts for
        // its tag plus payload, and the file ends on an 8-byte boundary.
        assert_eq!(bytes.len() % 8, 0);
        let mut offset = 128;
        let mut variables = 0;
        while offset < bytes.len() {
            assert_eq!(LittleEndian::read_u32(&bytes[offset..offset + 4]), MI_MATRIX);
            let size = LittleEndian::read_u32(&bytes[offset + 4..offset + 8]) as usize;
            offset += 8 + size;
            variables += 1;
        }
        assert_eq!(offset, bytes.len());
        assert_eq!(variables, 3);
    }

    #[test]
    fn test_missing_marker_becomes_nan() {
        // A series opened on the first update stays one row short; its MAT
        // column must carry NaN in the padded slot.
        let mut builder = SignalTableBuilder::new();
        builder.reset();
        let mut signals = DecodedSignalSet::new();
        signals.insert("A".to_string(), 1.0);
        builder.update(0.0, &signals);
        builder.update(0.1, &signals);
        builder.update(0.2, &signals);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.mat");
        write_chunk(&builder.finalize(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // Skip to the second variable (A) and read its last double.
        let time_size = LittleEndian::read_u32(&bytes[132..136]) as usize;
        let a_start = 128 + 8 + time_size;
        let a_size = LittleEndian::read_u32(&bytes[a_start + 4..a_start + 8]) as usize;
        let last_value = LittleEndian::read_f64(&bytes[a_start + 8 + a_size - 8..]);
        assert!(last_value.is_nan());
    }
}
