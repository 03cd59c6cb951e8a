use std::time::Instant;

use crate::scoring::domain::clip_classifier::ClipClassifier;
use crate::scoring::domain::clip_tensor::clip_tensor;
use crate::scoring::domain::clip_windower::Clip;
use crate::scoring::domain::crop_aligner::CropAligner;
use crate::scoring::domain::score_aggregator::ClipScore;
use crate::scoring::domain::scoring_error::ScoringError;
use crate::scoring::domain::track_store::TrackStore;
use crate::shared::constants::FINAL_OUTPUT_NAME;

use super::pipeline_logger::PipelineLogger;

/// Turns one clip into one score: gather, align, standardize, classify.
pub struct InferenceDriver {
    aligner: Box<dyn CropAligner>,
    classifier: Box<dyn ClipClassifier>,
}

impl InferenceDriver {
    pub fn new(aligner: Box<dyn CropAligner>, classifier: Box<dyn ClipClassifier>) -> Self {
        Self {
            aligner,
            classifier,
        }
    }

    pub fn score_clip(
        &mut self,
        store: &TrackStore,
        clip: &Clip,
        clip_index: usize,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ClipScore, ScoringError> {
        let mut geometries = Vec::with_capacity(clip.keys.len());
        let mut images = Vec::with_capacity(clip.keys.len());
        let mut frame_indices = Vec::with_capacity(clip.keys.len());
        for key in &clip.keys {
            let record = store.get(key).ok_or(ScoringError::MissingCrop(*key))?;
            geometries.push(record.geometry.clone());
            images.push(record.image.clone());
            frame_indices.push(record.frame_index);
        }

        let t0 = Instant::now();
        let (aligned_geometry, aligned) = self
            .aligner
            .align(&geometries, &images)
            .map_err(|e| alignment_error(clip_index, e.to_string()))?;
        if aligned.len() != images.len() || aligned_geometry.len() != geometries.len() {
            return Err(alignment_error(
                clip_index,
                format!(
                    "returned {} images for {} crops",
                    aligned.len(),
                    images.len()
                ),
            ));
        }
        let batch =
            clip_tensor(&aligned).map_err(|e| alignment_error(clip_index, e.to_string()))?;
        logger.timing("align", t0.elapsed().as_secs_f64() * 1000.0);

        let t1 = Instant::now();
        let output = self
            .classifier
            .classify(&batch)
            .map_err(|e| classifier_error(clip_index, e.to_string()))?;
        logger.timing("classify", t1.elapsed().as_secs_f64() * 1000.0);

        let score = output.final_output().ok_or_else(|| {
            classifier_error(clip_index, format!("output has no '{FINAL_OUTPUT_NAME}' field"))
        })?;
        if !score.is_finite() {
            return Err(classifier_error(
                clip_index,
                format!("'{FINAL_OUTPUT_NAME}' is {score}"),
            ));
        }

        Ok(ClipScore {
            score,
            frame_indices,
        })
    }
}

fn alignment_error(clip_index: usize, message: String) -> ScoringError {
    ScoringError::Alignment {
        clip_index,
        message,
    }
}

fn classifier_error(clip_index: usize, message: String) -> ScoringError {
    ScoringError::Classifier {
        clip_index,
        message,
    }
}
