use thiserror::Error;

use super::track_store::TrackKey;

/// Failures that stop scoring of a whole video.
///
/// Per-crop problems are not here: a degenerate crop only loses its own
/// frame and is logged where it happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("no face found")]
    EmptyTrackSet,

    #[error(
        "track {track_id} covers frames {start_frame}..{end_frame} but has {detections} detections"
    )]
    InconsistentLength {
        track_id: usize,
        start_frame: usize,
        end_frame: usize,
        detections: usize,
    },

    #[error("track {track_id} references frame {frame_index}, but only {available} frames were read")]
    MissingFrame {
        track_id: usize,
        frame_index: usize,
        available: usize,
    },

    #[error("no crop stored for track {} position {}", .0.track_id, .0.position)]
    MissingCrop(TrackKey),

    #[error("every face crop was empty, nothing to classify")]
    NoClips,

    #[error("tracker failed: {0}")]
    Tracker(String),

    #[error("alignment failed on clip {clip_index}: {message}")]
    Alignment { clip_index: usize, message: String },

    #[error("classifier failed on clip {clip_index}: {message}")]
    Classifier { clip_index: usize, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
