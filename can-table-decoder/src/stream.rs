//! Frame stream plumbing
//!
//! Frame sources produce a lazy, finite, forward-only sequence of raw frames
//! from some container format (BLF, MF4, ASC, ...); frame sinks consume one.
//! Raw format-to-format conversion is a straight copy between the two, and
//! chaining a [`MemorySink`] into a [`MemorySource`] hands a transcoded
//! stream to the decode pipeline without touching the filesystem.

use crate::types::{Frame, Result};

/// A forward-only stream of raw CAN frames
///
/// Sources are not restartable; a fresh source must be opened to re-read.
/// A read error is terminal for the stream.
pub trait FrameSource {
    /// Produce the next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Option<Result<Frame>>;
}

// Any fallible frame iterator is a source. Format parsers expose their
// iterators directly through this.
impl<I> FrameSource for I
where
    I: Iterator<Item = Result<Frame>>,
{
    fn next_frame(&mut self) -> Option<Result<Frame>> {
        self.next()
    }
}

/// In-memory frame source backed by a vector
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
}

impl MemorySource {
    /// Create a source over an already-materialized frame sequence
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

// FrameSource comes through the blanket iterator impl.
impl Iterator for MemorySource {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Result<Frame>> {
        self.frames.next().map(Ok)
    }
}

/// A consumer of raw CAN frames (format writers, memory buffers)
pub trait FrameSink {
    /// Append one frame to the sink
    fn write_frame(&mut self, frame: Frame) -> Result<()>;

    /// Flush any buffered state; must be called once after the last frame
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory frame sink, convertible into a [`MemorySource`]
#[derive(Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames collected so far
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frame has been collected
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Turn the collected frames into a source for the decode pipeline
    pub fn into_source(self) -> MemorySource {
        MemorySource::new(self.frames)
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: Frame) -> Result<()> {
        self.frames.push(frame);
        Ok(())
    }
}

/// Copy every frame from a source into a sink without decoding
///
/// Returns the number of frames copied. This is the whole of raw
/// format-to-format conversion; the container codecs on either side do the
/// actual byte work.
pub fn transcode<S, K>(mut source: S, sink: &mut K) -> Result<u64>
where
    S: FrameSource,
    K: FrameSink,
{
    let mut copied = 0u64;
    while let Some(frame) = source.next_frame() {
        sink.write_frame(frame?)?;
        copied += 1;
    }
    sink.finish()?;
    log::debug!("Transcoded {} frames", copied);
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frames() -> Vec<Frame> {
        vec![
            Frame::new(0x10, vec![1, 2], 0.0),
            Frame::new(0x20, vec![3], 0.1),
            Frame::new(0x10, vec![4, 5], 0.2),
        ]
    }

    #[test]
    fn test_memory_source_drains_in_order() {
        let mut source = MemorySource::new(sample_frames());
        let mut ids = Vec::new();
        while let Some(frame) = source.next_frame() {
            ids.push(frame.unwrap().arbitration_id);
        }
        assert_eq!(ids, vec![0x10, 0x20, 0x10]);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_transcode_roundtrip_in_memory() {
        let frames = sample_frames();
        let mut sink = MemorySink::new();
        let copied = transcode(MemorySource::new(frames.clone()), &mut sink).unwrap();
        assert_eq!(copied, 3);
        assert_eq!(sink.len(), 3);

        let mut source = sink.into_source();
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first, frames[0]);
    }

    #[test]
    fn test_iterator_is_a_source() {
        let mut iter = sample_frames().into_iter().map(Ok);
        let first = FrameSource::next_frame(&mut iter).unwrap().unwrap();
        assert_eq!(first.arbitration_id, 0x10);
    }
}
