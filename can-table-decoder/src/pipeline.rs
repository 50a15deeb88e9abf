//! Decode pipeline
//!
//! The orchestrator for one conversion: pull frames from a source, filter
//! by crop IDs, decode through the signal database, feed the table builder,
//! then finalize, resample and write chunks. One pipeline instance performs
//! one conversion; every conversion gets its own builder.

use crate::config::ConversionConfig;
use crate::crop::CropIdSet;
use crate::database::SignalDatabase;
use crate::resample::resample;
use crate::stream::FrameSource;
use crate::table::SignalTableBuilder;
use crate::types::{ConverterError, Result};
use crate::writer::write_table;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Pipeline lifecycle states
///
/// `Failed` is terminal and reachable from any state on unrecoverable
/// error; per-frame decode failures are absorbed instead and surface in the
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    DatabaseLoaded,
    CropListLoaded,
    Decoding,
    Finalizing,
    Resampling,
    Writing,
    Done,
    Failed,
}

/// Summary of one completed conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// Frames pulled from the source
    pub frames_read: u64,
    /// Frames rejected by the crop filter
    pub frames_filtered: u64,
    /// Frames decoded into at least one signal value
    pub frames_decoded: u64,
    /// Frames that passed the filter but failed to decode
    pub decode_failures: u64,
    /// Distinct arbitration IDs with no message definition, sorted
    pub unknown_ids: Vec<u32>,
    /// Rows in the written table (after resampling)
    pub rows_written: usize,
    /// Chunk files produced, in order
    pub output_files: Vec<PathBuf>,
}

/// One frame-stream-to-table conversion
pub struct ConversionPipeline<D: SignalDatabase> {
    config: ConversionConfig,
    database: Option<D>,
    crop: CropIdSet,
    state: PipelineState,
}

impl<D: SignalDatabase> ConversionPipeline<D> {
    /// Create an idle pipeline with the given configuration
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            database: None,
            crop: CropIdSet::disabled(),
            state: PipelineState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Attach the signal database; required before [`run`](Self::run)
    pub fn load_database(&mut self, database: D) {
        self.database = Some(database);
        if self.state == PipelineState::Idle {
            self.transition(PipelineState::DatabaseLoaded);
        }
    }

    /// Restrict decoding to an explicit allow-list of arbitration IDs
    pub fn set_crop_ids(&mut self, crop: CropIdSet) {
        self.crop = crop;
        self.transition(PipelineState::CropListLoaded);
    }

    /// Load the crop allow-list from a CSV file.
    ///
    /// A malformed or unreadable list disables crop mode so the conversion
    /// proceeds unfiltered; the load error is still returned so the caller
    /// can report it. A partially parsed set is never kept.
    pub fn load_crop_list(&mut self, path: &Path) -> Result<()> {
        match CropIdSet::from_csv_path(path) {
            Ok(crop) => {
                self.crop = crop;
                self.transition(PipelineState::CropListLoaded);
                Ok(())
            }
            Err(e) => {
                log::warn!("Crop list rejected, continuing unfiltered: {}", e);
                self.crop = CropIdSet::disabled();
                Err(e)
            }
        }
    }

    /// Drain the source and write the decoded table to `output`.
    ///
    /// Frames rejected by the filter or failing to decode are counted and
    /// skipped; a source read error, a degenerate resample range, an
    /// unsupported output extension, or a missing database end the
    /// conversion in the `Failed` state.
    pub fn run<S: FrameSource>(&mut self, source: S, output: &Path) -> Result<ConversionReport> {
        let result = self.run_stages(source, output);
        match result {
            Ok(report) => {
                self.transition(PipelineState::Done);
                log::info!(
                    "Conversion done: {} frames read, {} decoded, {} rows written to {} file(s)",
                    report.frames_read,
                    report.frames_decoded,
                    report.rows_written,
                    report.output_files.len()
                );
                Ok(report)
            }
            Err(e) => {
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    fn run_stages<S: FrameSource>(
        &mut self,
        mut source: S,
        output: &Path,
    ) -> Result<ConversionReport> {
        if self.database.is_none() {
            return Err(ConverterError::MissingDatabase);
        }

        self.transition(PipelineState::Decoding);
        if self.crop.is_enabled() {
            log::info!("Crop mode active: {:?} target IDs", self.crop.len());
        }

        let mut builder = SignalTableBuilder::new();
        builder.reset();
        let mut report = ConversionReport::default();
        let mut unknown_ids = BTreeSet::new();

        {
            let Some(database) = self.database.as_ref() else {
                return Err(ConverterError::MissingDatabase);
            };

            while let Some(next) = source.next_frame() {
                let frame = next?;
                report.frames_read += 1;

                if !self.crop.is_target(frame.arbitration_id) {
                    report.frames_filtered += 1;
                    continue;
                }

                match database.decode(frame.arbitration_id, &frame.payload) {
                    Ok(signals) => {
                        if signals.is_empty() {
                            // No target signals in this frame: no row advance.
                            log::trace!("Frame 0x{:X} decoded empty", frame.arbitration_id);
                            continue;
                        }
                        builder.update(frame.timestamp, &signals);
                        report.frames_decoded += 1;
                    }
                    Err(e) => {
                        report.decode_failures += 1;
                        if let ConverterError::UnknownFrameId(id) = e {
                            unknown_ids.insert(id);
                        }
                        log::debug!("Skipping frame: {}", e);
                    }
                }
            }
        }
        report.unknown_ids = unknown_ids.into_iter().collect();
        if report.decode_failures > 0 {
            log::warn!(
                "{} frame(s) skipped during decode ({} unknown IDs)",
                report.decode_failures,
                report.unknown_ids.len()
            );
        }

        self.transition(PipelineState::Finalizing);
        let table = builder.finalize();

        let table = match self.config.sampling_rate_hz {
            Some(rate) => {
                self.transition(PipelineState::Resampling);
                resample(table, rate)?
            }
            None => table,
        };

        self.transition(PipelineState::Writing);
        report.output_files = write_table(&table, output, self.config.chunk_size)?;
        report.rows_written = table.row_count();

        Ok(report)
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
