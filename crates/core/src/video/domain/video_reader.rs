use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Supplies the decoded frames of one video.
///
/// Scoring needs random access to every frame a track touches, so frames
/// are handed over as one in-memory batch rather than streamed.
pub trait VideoReader: Send {
    /// Opens the source and returns its metadata without decoding pixels.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Decodes at most `max_frames` frames from the start, in order.
    /// `frames[i].index()` is `i`.
    fn read(&mut self, max_frames: usize) -> Result<Vec<Frame>, Box<dyn std::error::Error>>;

    /// Releases any resources held by the reader.
    fn close(&mut self);
}
