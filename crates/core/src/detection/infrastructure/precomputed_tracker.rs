use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::face_track::FaceTrack;
use crate::detection::domain::face_tracker::FaceTracker;

/// Replays tracks computed ahead of time by an external tracker.
///
/// The detections passed to `track` are ignored; they only matter to the
/// longest-chain fallback when no tracks were recorded.
pub struct PrecomputedFaceTracker {
    tracks: Vec<FaceTrack>,
}

impl PrecomputedFaceTracker {
    pub fn new(tracks: Vec<FaceTrack>) -> Self {
        Self { tracks }
    }
}

impl FaceTracker for PrecomputedFaceTracker {
    fn track(
        &mut self,
        _detections: &[Vec<FaceDetection>],
    ) -> Result<Vec<FaceTrack>, Box<dyn std::error::Error>> {
        Ok(self.tracks.clone())
    }
}
