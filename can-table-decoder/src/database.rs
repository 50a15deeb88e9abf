//! Signal database seam
//!
//! The converter does not parse DBC files itself; it decodes frames through
//! this trait. An implementation maps an arbitration ID to the signal layout
//! of the matching message definition and extracts raw numeric values from
//! the payload bytes.

use crate::types::{DecodedSignalSet, Result};
use std::sync::Arc;

/// Decodes raw payload bytes into named signal values
pub trait SignalDatabase {
    /// Decode the payload of a frame with the given arbitration ID.
    ///
    /// Fails with [`ConverterError::UnknownFrameId`] when no message
    /// definition matches the ID. Values are raw numerics; enum labels are
    /// never substituted.
    ///
    /// [`ConverterError::UnknownFrameId`]: crate::ConverterError::UnknownFrameId
    fn decode(&self, arbitration_id: u32, payload: &[u8]) -> Result<DecodedSignalSet>;
}

// One database instance can serve several conversions at once; batch jobs
// hand out shared references or an Arc.
impl<D: SignalDatabase + ?Sized> SignalDatabase for &D {
    fn decode(&self, arbitration_id: u32, payload: &[u8]) -> Result<DecodedSignalSet> {
        (**self).decode(arbitration_id, payload)
    }
}

impl<D: SignalDatabase + ?Sized> SignalDatabase for Arc<D> {
    fn decode(&self, arbitration_id: u32, payload: &[u8]) -> Result<DecodedSignalSet> {
        (**self).decode(arbitration_id, payload)
    }
}
