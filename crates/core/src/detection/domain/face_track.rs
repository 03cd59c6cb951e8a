use serde::{Deserialize, Serialize};

use super::face_detection::FaceDetection;

/// A single face followed across consecutive frames.
///
/// Covers the half-open frame range `[start_frame, end_frame)` with one
/// detection per frame. Tracks read from outside the crate may violate
/// that; `is_consistent` reports whether they do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceTrack {
    pub start_frame: usize,
    pub end_frame: usize,
    pub detections: Vec<FaceDetection>,
}

impl FaceTrack {
    /// Track starting at `start_frame` with one detection per following frame.
    pub fn spanning(start_frame: usize, detections: Vec<FaceDetection>) -> Self {
        Self {
            start_frame,
            end_frame: start_frame + detections.len(),
            detections,
        }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Whether the frame range length equals the detection count.
    pub fn is_consistent(&self) -> bool {
        self.end_frame >= self.start_frame
            && self.end_frame - self.start_frame == self.detections.len()
    }

    /// `(frame_index, detection)` pairs in track order.
    pub fn frames(&self) -> impl Iterator<Item = (usize, &FaceDetection)> + '_ {
        (self.start_frame..).zip(self.detections.iter())
    }
}
