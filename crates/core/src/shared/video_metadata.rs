use std::path::PathBuf;

/// Dimensions and length of a frame sequence, as reported by a `VideoReader`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Number of frames that will actually be read under a frame cap.
    pub fn frames_to_read(&self, max_frames: usize) -> usize {
        self.total_frames.min(max_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(total_frames: usize) -> VideoMetadata {
        VideoMetadata {
            width: 1920,
            height: 1080,
            total_frames,
            source_path: Some(PathBuf::from("/tmp/frames")),
        }
    }

    #[test]
    fn test_construction() {
        let m = meta(900);
        assert_eq!(m.width, 1920);
        assert_eq!(m.height, 1080);
        assert_eq!(m.total_frames, 900);
        assert_eq!(m.source_path, Some(PathBuf::from("/tmp/frames")));
    }

    #[test]
    fn test_frames_to_read_caps_long_videos() {
        assert_eq!(meta(900).frames_to_read(300), 300);
    }

    #[test]
    fn test_frames_to_read_short_video_unchanged() {
        assert_eq!(meta(120).frames_to_read(300), 120);
    }
}
