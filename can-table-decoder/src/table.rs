//! Incremental signal table building
//!
//! The builder consumes decoded per-frame signal sets and grows a sparse
//! set of per-signal series next to a shared time axis. Forward-fill carries
//! the last known value of every signal into rows where it was not
//! retransmitted; `finalize` densifies the state into a [`SignalTable`] with
//! a deterministic column order.

use crate::types::DecodedSignalSet;
use std::collections::HashMap;

/// A dense, time-aligned signal table
///
/// One row per recorded update event. The first column is `time`; signal
/// columns follow in lexicographic name order. Every column has the same
/// length; a `None` entry marks a slot the signal never covered.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    time: Vec<f64>,
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl SignalTable {
    /// Create an empty table with no columns
    pub fn empty() -> Self {
        Self {
            time: Vec::new(),
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.time.len()
    }

    /// True if the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The time axis
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Signal column names in table order (lexicographic)
    pub fn signal_names(&self) -> &[String] {
        &self.names
    }

    /// Full header: `time` followed by the signal names
    pub fn header(&self) -> Vec<&str> {
        std::iter::once("time")
            .chain(self.names.iter().map(String::as_str))
            .collect()
    }

    /// Look up one signal column by name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate over `(name, column)` pairs in table order
    pub fn signal_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Keep every `stride`-th row starting at index 0
    pub(crate) fn take_every(&self, stride: usize) -> SignalTable {
        SignalTable {
            time: self.time.iter().copied().step_by(stride).collect(),
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| col.iter().copied().step_by(stride).collect())
                .collect(),
        }
    }

    /// Copy the half-open row range `start..end`
    pub(crate) fn slice_rows(&self, start: usize, end: usize) -> SignalTable {
        SignalTable {
            time: self.time[start..end].to_vec(),
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| col[start..end].to_vec())
                .collect(),
        }
    }
}

/// Builds a [`SignalTable`] incrementally from decoded signal sets
///
/// The update algorithm carries a deliberate timestamp-shift quirk: the row
/// a timestamp closes belongs to the *following* update, not to the one
/// that delivered the decoded values. The module tests pin the observable
/// consequences; do not straighten the alignment.
#[derive(Debug, Default)]
pub struct SignalTableBuilder {
    time: Vec<f64>,
    series: HashMap<String, Vec<f64>>,
    update_count: u64,
}

impl SignalTableBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state; must run once before the first update of a conversion
    pub fn reset(&mut self) {
        self.time.clear();
        self.series.clear();
        self.update_count = 0;
    }

    /// Number of updates recorded since the last reset
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// True if no update has been recorded
    pub fn is_empty(&self) -> bool {
        self.update_count == 0
    }

    /// Record one decoded frame.
    ///
    /// From the third update on, every tracked series is forward-filled with
    /// its own last value before the new values are written; the first two
    /// updates only extend the time axis. A series seen for the first time
    /// is backfilled with zeros up to the current row count.
    pub fn update(&mut self, timestamp: f64, decoded_signals: &DecodedSignalSet) {
        self.update_count += 1;

        if self.update_count > 2 {
            for series in self.series.values_mut() {
                if let Some(&last) = series.last() {
                    series.push(last);
                }
            }
        }
        // Appending a copy of the last timestamp and correcting it in place
        // collapses to a plain append of the new one.
        self.time.push(timestamp);

        let rows = self.time.len();
        for (name, &value) in decoded_signals {
            match self.series.get_mut(name) {
                Some(series) => {
                    if let Some(last) = series.last_mut() {
                        *last = value;
                    }
                }
                None => {
                    let mut series = vec![0.0; rows];
                    series[rows - 1] = value;
                    self.series.insert(name.clone(), series);
                }
            }
        }
    }

    /// Densify the accumulated state into a [`SignalTable`].
    ///
    /// Series shorter than the time axis are padded at the tail with the
    /// missing marker - `None`, not zero; the zero fill is reserved for rows
    /// before a signal's first appearance. Columns are ordered `time` first,
    /// then signal names lexicographically.
    pub fn finalize(self) -> SignalTable {
        let rows = self.time.len();

        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort_unstable();

        let mut series = self.series;
        let columns = names
            .iter()
            .map(|name| {
                let values = series.remove(name).unwrap_or_default();
                debug_assert!(values.len() <= rows);
                let missing = rows - values.len().min(rows);
                values
                    .into_iter()
                    .map(Some)
                    .chain(std::iter::repeat(None).take(missing))
                    .collect()
            })
            .collect();

        log::debug!("Finalized table: {} rows, {} signals", rows, names.len());

        SignalTable {
            time: self.time,
            names,
            columns,
        }
    }
}
