//! Conversion configuration types
//!
//! This module defines the minimal configuration one conversion needs. The
//! pipeline takes everything as explicit parameters - there is no global or
//! session state.

use serde::{Deserialize, Serialize};

/// Configuration for one conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Maximum number of rows per output chunk file
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Target sampling rate in Hz for downsampling; `None` keeps the native rate
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate_hz: Option<f64>,
}

fn default_chunk_size() -> usize {
    100_000
}

fn default_sampling_rate() -> Option<f64> {
    Some(10.0)
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            sampling_rate_hz: default_sampling_rate(),
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the maximum rows per output chunk
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builder method: set the target sampling rate in Hz
    pub fn with_sampling_rate(mut self, rate_hz: f64) -> Self {
        self.sampling_rate_hz = Some(rate_hz);
        self
    }

    /// Builder method: keep the table at its native rate
    pub fn without_resampling(mut self) -> Self {
        self.sampling_rate_hz = None;
        self
    }
}
