//! Table downsampling
//!
//! Reduces a dense table to a target sampling rate by keeping every
//! stride-th row. Upsampling is never performed: a table already at or
//! below the target rate passes through unchanged.

use crate::table::SignalTable;
use crate::types::{ConverterError, Result};

/// Downsample a table to approximately `target_rate_hz`.
///
/// The stride is `floor(row_count / floor(duration * rate))`. A target of
/// zero rows - non-positive duration, non-positive rate, or an empty table -
/// fails with [`ConverterError::DegenerateRange`] so that the caller never
/// divides by zero.
pub fn resample(table: SignalTable, target_rate_hz: f64) -> Result<SignalTable> {
    let duration = duration_of(&table);
    let target_rows = (duration * target_rate_hz).floor() as i64;
    if target_rows <= 0 {
        return Err(ConverterError::DegenerateRange {
            duration_s: duration,
            rate_hz: target_rate_hz,
        });
    }

    let stride = table.row_count() / target_rows as usize;
    if stride < 1 {
        // Already at or below the target rate; nothing to drop.
        return Ok(table);
    }

    let resampled = table.take_every(stride);
    log::debug!(
        "Resampled {} rows to {} at {} Hz (stride {})",
        table.row_count(),
        resampled.row_count(),
        target_rate_hz,
        stride
    );
    Ok(resampled)
}

/// Time span covered by the table, zero when empty
fn duration_of(table: &SignalTable) -> f64 {
    let time = table.time();
    let min = time.iter().copied().fold(f64::INFINITY, f64::min);
    let max = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if time.is_empty() {
        0.0
    } else {
        max - min
    }
}
