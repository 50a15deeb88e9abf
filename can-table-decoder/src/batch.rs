//! Parallel batch conversions
//!
//! Each batch job owns its frame source, database handle, optional crop
//! list and output path; jobs share no mutable state, so a batch runs them
//! in parallel and collects one result per job. One failed conversion never
//! prevents the others from completing.

use crate::config::ConversionConfig;
use crate::database::SignalDatabase;
use crate::pipeline::{ConversionPipeline, ConversionReport};
use crate::stream::FrameSource;
use crate::types::Result;
use rayon::prelude::*;
use std::path::PathBuf;

/// One independent conversion in a batch
pub struct BatchJob<S, D> {
    /// Frame source for this job (consumed by the conversion)
    pub source: S,
    /// Signal database handle; share one database via `&` or `Arc`
    pub database: D,
    /// Optional crop allow-list; a failing load falls back to unfiltered
    pub crop_list: Option<PathBuf>,
    /// Output path, `.csv` or `.mat`
    pub output: PathBuf,
}

/// Run every job with the same configuration, in parallel.
///
/// Returns one result per job, in job order.
pub fn run_batch<S, D>(
    jobs: Vec<BatchJob<S, D>>,
    config: &ConversionConfig,
) -> Vec<Result<ConversionReport>>
where
    S: FrameSource + Send,
    D: SignalDatabase + Send,
{
    log::info!("Running batch of {} conversion(s)", jobs.len());

    jobs.into_par_iter()
        .map(|job| {
            let mut pipeline = ConversionPipeline::new(config.clone());
            pipeline.load_database(job.database);
            if let Some(crop_list) = &job.crop_list {
                if let Err(e) = pipeline.load_crop_list(crop_list) {
                    log::warn!("Batch job {:?}: {}", job.output, e);
                }
            }
            pipeline.run(job.source, &job.output)
        })
        .collect()
}
