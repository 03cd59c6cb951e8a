use super::face_detection::FaceDetection;
use super::face_track::FaceTrack;

/// Domain interface for grouping per-frame detections into face tracks.
///
/// `detections[i]` holds every face found in frame `i`. Implementations may
/// return zero tracks; callers apply the longest-chain fallback themselves.
pub trait FaceTracker: Send {
    fn track(
        &mut self,
        detections: &[Vec<FaceDetection>],
    ) -> Result<Vec<FaceTrack>, Box<dyn std::error::Error>>;
}
