//! Standalone frame-to-table conversion demo
//!
//! Builds a small synthetic frame stream, decodes it with a toy signal
//! database (payload byte 0 is the signal value) and writes the resulting
//! table as chunked CSV files.
//!
//! Usage:
//!   cargo run --example decode_frames [output.csv]

use anyhow::Result;
use can_table_decoder::{
    ConversionConfig, ConversionPipeline, ConverterError, DecodedSignalSet, Frame, MemorySource,
    SignalDatabase,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Toy database: each known ID carries one signal named after the message
struct DemoDatabase {
    signals: HashMap<u32, String>,
}

impl DemoDatabase {
    fn new() -> Self {
        let mut signals = HashMap::new();
        signals.insert(0x1A0, "EngineSpeed".to_string());
        signals.insert(0x1B0, "VehicleSpeed".to_string());
        signals.insert(0x2C0, "BrakePressure".to_string());
        Self { signals }
    }
}

impl SignalDatabase for DemoDatabase {
    fn decode(
        &self,
        arbitration_id: u32,
        payload: &[u8],
    ) -> can_table_decoder::Result<DecodedSignalSet> {
        let name = self
            .signals
            .get(&arbitration_id)
            .ok_or(ConverterError::UnknownFrameId(arbitration_id))?;
        let mut decoded = DecodedSignalSet::new();
        decoded.insert(name.clone(), payload.first().copied().unwrap_or(0) as f64);
        Ok(decoded)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demo_output.csv"));

    // 10 seconds of traffic: engine data at 100 Hz, brake data at 10 Hz,
    // plus an ID the database does not know.
    let mut frames = Vec::new();
    for i in 0..1000u32 {
        let t = i as f64 * 0.01;
        frames.push(Frame::new(0x1A0, vec![(i % 250) as u8], t));
        if i % 10 == 0 {
            frames.push(Frame::new(0x2C0, vec![(i / 10) as u8], t));
        }
        if i % 100 == 0 {
            frames.push(Frame::new(0x7FF, vec![0xFF], t));
        }
    }

    let config = ConversionConfig::new()
        .with_sampling_rate(10.0)
        .with_chunk_size(50);

    let mut pipeline = ConversionPipeline::new(config);
    pipeline.load_database(DemoDatabase::new());
    let report = pipeline.run(MemorySource::new(frames), &output)?;

    println!("Frames read:     {}", report.frames_read);
    println!("Frames decoded:  {}", report.frames_decoded);
    println!("Decode failures: {}", report.decode_failures);
    println!("Unknown IDs:     {:?}", report.unknown_ids);
    println!("Rows written:    {}", report.rows_written);
    for path in &report.output_files {
        println!("  -> {}", path.display());
    }

    Ok(())
}
