//! Crop-ID filtering
//!
//! Crop mode restricts decoding to an allow-list of arbitration IDs loaded
//! from a tabular file. Without a list, every frame passes.

use crate::types::{ConverterError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Optional allow-list of arbitration IDs
///
/// A disabled set accepts every ID; an enabled one accepts exactly its
/// members. Membership checks are O(1) and side-effect-free.
#[derive(Debug, Clone, Default)]
pub struct CropIdSet {
    ids: Option<HashSet<u32>>,
}

impl CropIdSet {
    /// Create a set that accepts every arbitration ID
    pub fn disabled() -> Self {
        Self { ids: None }
    }

    /// Create a set from explicit IDs
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
        }
    }

    /// Load the allow-list from a CSV file with an `ID` header column.
    ///
    /// Each cell of the column is either a `0x`-prefixed hexadecimal string
    /// or a plain unsigned integer; rows that are neither are silently
    /// ignored. An unreadable file or a missing `ID` column fails with
    /// [`ConverterError::CropListLoad`] - never with a partially parsed set.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        log::info!("Loading crop ID list: {:?}", path);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| ConverterError::CropListLoad(format!("{:?}: {}", path, e)))?;

        let headers = reader
            .headers()
            .map_err(|e| ConverterError::CropListLoad(format!("{:?}: {}", path, e)))?;

        let id_column = headers
            .iter()
            .position(|h| h.trim() == "ID")
            .ok_or_else(|| {
                ConverterError::CropListLoad(format!("{:?}: no 'ID' column", path))
            })?;

        let mut ids = HashSet::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| ConverterError::CropListLoad(format!("{:?}: {}", path, e)))?;
            let Some(cell) = record.get(id_column) else {
                continue;
            };
            if let Some(id) = parse_id(cell) {
                ids.insert(id);
            }
        }

        log::info!("Crop mode enabled with {} IDs", ids.len());
        Ok(Self { ids: Some(ids) })
    }

    /// True if crop mode is active
    pub fn is_enabled(&self) -> bool {
        self.ids.is_some()
    }

    /// Number of allowed IDs, or `None` when crop mode is disabled
    pub fn len(&self) -> Option<usize> {
        self.ids.as_ref().map(|ids| ids.len())
    }

    /// Decide whether a frame with this arbitration ID should be decoded
    pub fn is_target(&self, arbitration_id: u32) -> bool {
        match &self.ids {
            Some(ids) => ids.contains(&arbitration_id),
            None => true,
        }
    }
}

/// Parse one ID cell: `0x`-prefixed hex or plain decimal
fn parse_id(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Some(hex) = cell.strip_prefix("0x").or_else(|| cell.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        cell.parse::<u32>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_disabled_accepts_everything() {
        let crop = CropIdSet::disabled();
        assert!(!crop.is_enabled());
        assert!(crop.is_target(0x100));
        assert!(crop.is_target(0xFFFF_FFFF));
    }

    #[test]
    fn test_membership() {
        let crop = CropIdSet::from_ids([0x100, 0x200]);
        assert!(crop.is_enabled());
        assert!(crop.is_target(0x100));
        assert!(crop.is_target(0x200));
        assert!(!crop.is_target(0x300));
    }

    #[test]
    fn test_load_csv_hex_decimal_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Name,ID,Comment").unwrap();
        writeln!(file, "EngineData,0x1A0,hex row").unwrap();
        writeln!(file, "BrakeData,416,decimal row").unwrap();
        writeln!(file, "Junk,not-an-id,ignored").unwrap();
        writeln!(file, "Empty,,ignored").unwrap();

        let crop = CropIdSet::from_csv_path(&path).unwrap();
        assert_eq!(crop.len(), Some(2));
        assert!(crop.is_target(0x1A0));
        assert!(crop.is_target(416));
        assert!(!crop.is_target(0x999));
    }

    #[test]
    fn test_load_csv_missing_id_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Name,Address").unwrap();
        writeln!(file, "EngineData,0x1A0").unwrap();

        let err = CropIdSet::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, ConverterError::CropListLoad(_)));
    }

    #[test]
    fn test_load_csv_unreadable_file() {
        let err = CropIdSet::from_csv_path(Path::new("no-such-file.csv")).unwrap_err();
        assert!(matches!(err, ConverterError::CropListLoad(_)));
    }
}
