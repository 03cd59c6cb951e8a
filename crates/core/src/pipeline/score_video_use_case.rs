use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::face_track::FaceTrack;
use crate::detection::domain::face_tracker::FaceTracker;
use crate::scoring::domain::clip_classifier::ClipClassifier;
use crate::scoring::domain::clip_windower::ClipWindower;
use crate::scoring::domain::crop_aligner::CropAligner;
use crate::scoring::domain::crop_normalizer::CropNormalizer;
use crate::scoring::domain::score_aggregator::{FrameScoreAccumulator, VideoScores};
use crate::scoring::domain::scoring_error::ScoringError;
use crate::scoring::domain::track_store::{CropRecord, TrackKey, TrackStore};
use crate::shared::frame::Frame;

use super::inference_driver::InferenceDriver;
use super::pipeline_logger::PipelineLogger;
use super::scoring_config::ScoringConfig;
use super::track_resolution::{resolve_tracks, validate_tracks};

/// Scores one video from its face tracks and decoded frames.
///
/// Every call builds its own crop store and accumulator and opens a new
/// logger section, so one use case can score any number of videos in
/// sequence and each result and summary covers only its own video. Clips
/// run one at a time in track order, then window order; the first clip
/// that fails aborts the video.
pub struct ScoreVideoUseCase {
    normalizer: CropNormalizer,
    windower: ClipWindower,
    driver: InferenceDriver,
    logger: Box<dyn PipelineLogger>,
}

impl ScoreVideoUseCase {
    pub fn new(
        config: &ScoringConfig,
        aligner: Box<dyn CropAligner>,
        classifier: Box<dyn ClipClassifier>,
        logger: Box<dyn PipelineLogger>,
    ) -> Result<Self, ScoringError> {
        config
            .validate()
            .map_err(|e| ScoringError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            normalizer: CropNormalizer::new(config.crop_scale),
            windower: ClipWindower::new(config.clip_size, config.padding),
            driver: InferenceDriver::new(aligner, classifier),
            logger,
        })
    }

    /// Resolves tracks from raw detections, then scores them.
    pub fn execute(
        &mut self,
        tracker: &mut dyn FaceTracker,
        detections: &[Vec<FaceDetection>],
        frames: &[Frame],
    ) -> Result<VideoScores, ScoringError> {
        let tracks = resolve_tracks(tracker, detections)?;
        self.process_video(&tracks, frames)
    }

    /// Scores already-resolved tracks. `frames[i]` must be frame `i` of
    /// the video.
    pub fn process_video(
        &mut self,
        tracks: &[FaceTrack],
        frames: &[Frame],
    ) -> Result<VideoScores, ScoringError> {
        validate_tracks(tracks, frames.len())?;
        self.logger.begin_video(tracks.len(), frames.len());

        let mut accumulator = FrameScoreAccumulator::new();
        let store = self.build_store(tracks, frames, &mut accumulator);

        let clips = self.windower.clips(&store);
        if clips.is_empty() {
            return Err(ScoringError::NoClips);
        }
        for track_id in store.track_ids() {
            let count = clips.iter().filter(|c| c.track_id == track_id).count();
            self.logger.metric("clips_per_track", count as f64);
        }

        let total = clips.len();
        for (clip_index, clip) in clips.iter().enumerate() {
            let score = self
                .driver
                .score_clip(&store, clip, clip_index, self.logger.as_mut())?;
            log::debug!(
                "Clip {clip_index} (track {}) scored {:.6}",
                clip.track_id,
                score.score
            );
            accumulator.add_clip(&score);
            self.logger.progress(clip_index + 1, total);
        }

        let scores = accumulator.finalize()?;
        self.logger
            .finish_video(scores.video_score, scores.clip_count);
        Ok(scores)
    }

    fn build_store(
        &mut self,
        tracks: &[FaceTrack],
        frames: &[Frame],
        accumulator: &mut FrameScoreAccumulator,
    ) -> TrackStore {
        let mut store = TrackStore::new();
        let mut skipped = 0usize;

        for (track_id, track) in tracks.iter().enumerate() {
            for (position, (frame_index, detection)) in track.frames().enumerate() {
                accumulator.record_box(frame_index, detection.rounded_box());

                match self.normalizer.normalize(detection, &frames[frame_index]) {
                    Ok((image, geometry)) => store.insert(
                        TrackKey::new(track_id, position),
                        CropRecord {
                            image,
                            geometry,
                            frame_index,
                        },
                    ),
                    Err(e) => {
                        skipped += 1;
                        log::warn!(
                            "Skipping track {track_id} position {position} (frame {frame_index}): {e}"
                        );
                    }
                }
            }
        }

        self.logger.metric("degenerate_crops", skipped as f64);
        store
    }
}
