//! JSON exchange format written by the external detector/tracker.
//!
//! ```json
//! {
//!   "frames": [[{"bbox": [..], "landmarks5": [..], "landmarks68": [..], "score": 0.9}], []],
//!   "tracks": [{"start_frame": 0, "end_frame": 2, "detections": [..]}]
//! }
//! ```
//!
//! `frames` is required and holds every detection per frame. `tracks` is
//! optional; when it is absent or empty the pipeline falls back to the
//! longest single-face chain over `frames`.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::face_detection::{FaceDetection, DENSE_LANDMARK_COUNT};
use crate::detection::domain::face_track::FaceTrack;

#[derive(Error, Debug)]
pub enum DetectionFileError {
    #[error("failed to read detections from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid detection JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{location} has {found} dense landmarks, expected {}", DENSE_LANDMARK_COUNT)]
    Landmarks { location: String, found: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFile {
    pub frames: Vec<Vec<FaceDetection>>,
    #[serde(default)]
    pub tracks: Vec<FaceTrack>,
}

impl DetectionFile {
    pub fn load(path: &Path) -> Result<Self, DetectionFileError> {
        let json = fs::read_to_string(path).map_err(|e| DetectionFileError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: DetectionFile =
            serde_json::from_str(&json).map_err(|e| DetectionFileError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        file.validate()?;

        log::debug!(
            "Loaded {} frames of detections and {} tracks from {}",
            file.frames.len(),
            file.tracks.len(),
            path.display()
        );
        Ok(file)
    }

    /// Truncates to the first `frame_count` frames. Tracks crossing the
    /// end are cut at `frame_count`; tracks starting at or after it are
    /// dropped.
    pub fn truncate(&mut self, frame_count: usize) {
        self.frames.truncate(frame_count);
        let before = self.tracks.len();
        self.tracks.retain(|t| t.start_frame < frame_count);
        let dropped = before - self.tracks.len();

        let mut trimmed = 0;
        for track in self.tracks.iter_mut().filter(|t| t.end_frame > frame_count) {
            track.detections.truncate(frame_count - track.start_frame);
            track.end_frame = frame_count;
            trimmed += 1;
        }
        if dropped > 0 || trimmed > 0 {
            log::debug!(
                "Cut detections at frame {frame_count}: {trimmed} tracks trimmed, {dropped} dropped"
            );
        }
    }

    fn validate(&self) -> Result<(), DetectionFileError> {
        for (frame_index, faces) in self.frames.iter().enumerate() {
            for (face_index, face) in faces.iter().enumerate() {
                check_landmarks(face, || format!("frame {frame_index} face {face_index}"))?;
            }
        }
        for (track_id, track) in self.tracks.iter().enumerate() {
            for (position, face) in track.detections.iter().enumerate() {
                check_landmarks(face, || format!("track {track_id} position {position}"))?;
            }
        }
        Ok(())
    }
}

fn check_landmarks(
    face: &FaceDetection,
    location: impl FnOnce() -> String,
) -> Result<(), DetectionFileError> {
    if face.landmarks68.len() != DENSE_LANDMARK_COUNT {
        return Err(DetectionFileError::Landmarks {
            location: location(),
            found: face.landmarks68.len(),
        });
    }
    Ok(())
}
