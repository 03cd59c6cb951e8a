use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::face_track::FaceTrack;
use crate::detection::domain::face_tracker::FaceTracker;
use crate::detection::domain::longest_track::find_longest;
use crate::scoring::domain::scoring_error::ScoringError;

/// Runs the tracker and falls back to the longest single-face chain when
/// it returns nothing.
///
/// Fails with `EmptyTrackSet` only if there is not a single detection.
pub fn resolve_tracks(
    tracker: &mut dyn FaceTracker,
    detections: &[Vec<FaceDetection>],
) -> Result<Vec<FaceTrack>, ScoringError> {
    let tracks = tracker
        .track(detections)
        .map_err(|e| ScoringError::Tracker(e.to_string()))?;
    if !tracks.is_empty() {
        return Ok(tracks);
    }

    log::warn!("Tracker found no face tracks, falling back to the longest detection chain");
    let longest = find_longest(detections).ok_or(ScoringError::EmptyTrackSet)?;
    log::info!(
        "Fallback track covers frames {}..{}",
        longest.start_frame,
        longest.end_frame
    );
    Ok(vec![longest])
}

/// Checks every track against its own detections and the frames read.
pub fn validate_tracks(tracks: &[FaceTrack], frame_count: usize) -> Result<(), ScoringError> {
    if tracks.is_empty() {
        return Err(ScoringError::EmptyTrackSet);
    }
    for (track_id, track) in tracks.iter().enumerate() {
        if !track.is_consistent() {
            return Err(ScoringError::InconsistentLength {
                track_id,
                start_frame: track.start_frame,
                end_frame: track.end_frame,
                detections: track.len(),
            });
        }
        if track.end_frame > frame_count {
            return Err(ScoringError::MissingFrame {
                track_id,
                frame_index: track.end_frame - 1,
                available: frame_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f64) -> FaceDetection {
        FaceDetection {
            bbox: [x, 0.0, x + 40.0, 40.0],
            landmarks5: [(0.0, 0.0); 5],
            landmarks68: Vec::new(),
            score: 0.9,
        }
    }

    struct StubTracker {
        result: Result<Vec<FaceTrack>, String>,
    }

    impl FaceTracker for StubTracker {
        fn track(
            &mut self,
            _detections: &[Vec<FaceDetection>],
        ) -> Result<Vec<FaceTrack>, Box<dyn std::error::Error>> {
            self.result.clone().map_err(|e| e.into())
        }
    }

    #[test]
    fn test_tracker_result_used_when_non_empty() {
        let tracks = vec![FaceTrack::spanning(0, vec![det(0.0)])];
        let mut tracker = StubTracker {
            result: Ok(tracks.clone()),
        };
        let detections = vec![vec![det(0.0)], vec![det(1.0)], vec![det(2.0)]];

        assert_eq!(resolve_tracks(&mut tracker, &detections).unwrap(), tracks);
    }

    #[test]
    fn test_empty_tracker_falls_back_to_longest_chain() {
        let mut tracker = StubTracker { result: Ok(Vec::new()) };
        let detections = vec![vec![], vec![det(0.0)], vec![det(1.0)]];

        let tracks = resolve_tracks(&mut tracker, &detections).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!((tracks[0].start_frame, tracks[0].end_frame), (1, 3));
    }

    #[test]
    fn test_no_detections_is_empty_track_set() {
        let mut tracker = StubTracker { result: Ok(Vec::new()) };
        let detections = vec![vec![], vec![]];

        assert_eq!(
            resolve_tracks(&mut tracker, &detections),
            Err(ScoringError::EmptyTrackSet)
        );
    }

    #[test]
    fn test_tracker_failure_is_reported() {
        let mut tracker = StubTracker {
            result: Err("model missing".to_string()),
        };
        assert_eq!(
            resolve_tracks(&mut tracker, &[]),
            Err(ScoringError::Tracker("model missing".to_string()))
        );
    }

    #[test]
    fn test_validate_accepts_tracks_inside_video() {
        let tracks = vec![FaceTrack::spanning(2, vec![det(0.0), det(1.0)])];
        assert!(validate_tracks(&tracks, 4).is_ok());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let tracks = vec![FaceTrack {
            start_frame: 0,
            end_frame: 3,
            detections: vec![det(0.0)],
        }];
        assert!(matches!(
            validate_tracks(&tracks, 10),
            Err(ScoringError::InconsistentLength { track_id: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_track_past_last_frame() {
        let tracks = vec![
            FaceTrack::spanning(0, vec![det(0.0)]),
            FaceTrack::spanning(3, vec![det(0.0), det(1.0)]),
        ];
        assert_eq!(
            validate_tracks(&tracks, 4),
            Err(ScoringError::MissingFrame {
                track_id: 1,
                frame_index: 4,
                available: 4,
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_set() {
        assert_eq!(validate_tracks(&[], 5), Err(ScoringError::EmptyTrackSet));
    }
}
