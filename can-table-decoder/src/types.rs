//! Core types for the CAN table decoder library
//!
//! This module defines the fundamental types flowing through the conversion
//! pipeline: raw frames as read from a log source, decoded signal sets as
//! produced by a signal database, and the error taxonomy for one conversion.

use std::collections::HashMap;

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Decoded signal values of one frame: signal name → raw numeric value.
///
/// Only signals defined for the frame's arbitration ID are present. Values
/// are always raw numerics; enum labels are never substituted.
pub type DecodedSignalSet = HashMap<String, f64>;

/// Raw CAN frame from a log source (BLF, MF4, ASC, ...)
///
/// This represents a single CAN frame as handed over by a frame source,
/// before any signal decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// CAN message ID (11-bit or 29-bit)
    pub arbitration_id: u32,
    /// Frame data bytes (0-8 bytes for classic CAN, up to 64 for CAN-FD)
    pub payload: Vec<u8>,
    /// Timestamp in seconds, monotonically non-decreasing within one source
    pub timestamp: f64,
}

impl Frame {
    /// Create a new frame
    pub fn new(arbitration_id: u32, payload: Vec<u8>, timestamp: f64) -> Self {
        Self {
            arbitration_id,
            payload,
            timestamp,
        }
    }

    /// Get the data length code (DLC) - number of payload bytes
    pub fn dlc(&self) -> usize {
        self.payload.len()
    }
}

/// Errors that can occur during a conversion
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("No signal database loaded")]
    MissingDatabase,

    #[error("No message definition for CAN ID 0x{0:X}")]
    UnknownFrameId(u32),

    #[error("Failed to load crop ID list: {0}")]
    CropListLoad(String),

    #[error("Cannot reach {rate_hz} Hz over {duration_s} s of data")]
    DegenerateRange { duration_s: f64, rate_hz: f64 },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read frame source: {0}")]
    SourceRead(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
