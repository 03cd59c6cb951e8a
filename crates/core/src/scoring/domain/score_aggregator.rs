use std::collections::BTreeMap;

use super::scoring_error::ScoringError;

/// Everything known about one source frame after scoring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameScore {
    /// Score of every clip that covered this frame, in processing order.
    pub scores: Vec<f64>,
    /// Representative face box, rounded to whole pixels.
    pub bbox: Option<[i32; 4]>,
}

impl FrameScore {
    pub fn mean(&self) -> Option<f64> {
        mean(&self.scores)
    }
}

/// Classifier result for one clip and the source frames it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipScore {
    pub score: f64,
    pub frame_indices: Vec<usize>,
}

/// Collects clip scores per frame for a single video.
///
/// Created for one video and consumed by `finalize`; nothing carries over
/// between videos.
#[derive(Debug, Default)]
pub struct FrameScoreAccumulator {
    frames: BTreeMap<usize, FrameScore>,
    clip_scores: Vec<f64>,
}

impl FrameScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the representative box of a frame. Later calls win.
    pub fn record_box(&mut self, frame_index: usize, bbox: [i32; 4]) {
        self.frames.entry(frame_index).or_default().bbox = Some(bbox);
    }

    /// Adds `clip.score` to every frame the clip covers. A frame that appears
    /// twice in one padded clip receives the score twice.
    pub fn add_clip(&mut self, clip: &ClipScore) {
        for &frame_index in &clip.frame_indices {
            self.frames
                .entry(frame_index)
                .or_default()
                .scores
                .push(clip.score);
        }
        self.clip_scores.push(clip.score);
    }

    pub fn clip_count(&self) -> usize {
        self.clip_scores.len()
    }

    pub fn finalize(self) -> Result<VideoScores, ScoringError> {
        let video_score = mean(&self.clip_scores).ok_or(ScoringError::NoClips)?;
        Ok(VideoScores {
            video_score,
            clip_count: self.clip_scores.len(),
            per_frame: self.frames,
        })
    }
}

/// Final scores for one video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoScores {
    /// Mean over all clip scores, not over per-frame means.
    pub video_score: f64,
    pub clip_count: usize,
    pub per_frame: BTreeMap<usize, FrameScore>,
}

impl VideoScores {
    /// Mean score of `frame_index`, or `None` if no clip covered it.
    pub fn frame_score(&self, frame_index: usize) -> Option<f64> {
        self.per_frame.get(&frame_index).and_then(FrameScore::mean)
    }

    /// Mean score of every covered frame.
    pub fn per_frame_scores(&self) -> BTreeMap<usize, f64> {
        self.per_frame
            .iter()
            .filter_map(|(&index, frame)| frame.mean().map(|score| (index, score)))
            .collect()
    }

    pub fn bbox(&self, frame_index: usize) -> Option<[i32; 4]> {
        self.per_frame.get(&frame_index).and_then(|f| f.bbox)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn clip(score: f64, frames: &[usize]) -> ClipScore {
        ClipScore {
            score,
            frame_indices: frames.to_vec(),
        }
    }

    #[test]
    fn test_video_score_is_mean_of_clip_scores() {
        let mut acc = FrameScoreAccumulator::new();
        acc.add_clip(&clip(0.2, &[0, 1, 2]));
        acc.add_clip(&clip(0.4, &[1, 2, 3]));
        acc.add_clip(&clip(0.9, &[10, 11, 12, 13, 14]));

        let scores = acc.finalize().unwrap();
        assert_relative_eq!(scores.video_score, 0.5);
        assert_eq!(scores.clip_count, 3);
    }

    #[test]
    fn test_video_score_differs_from_mean_of_frame_means() {
        let mut acc = FrameScoreAccumulator::new();
        acc.add_clip(&clip(0.0, &[0, 1]));
        acc.add_clip(&clip(1.0, &[1, 2]));
        acc.add_clip(&clip(1.0, &[2, 3]));

        let scores = acc.finalize().unwrap();
        let frame_means = scores.per_frame_scores();
        let mean_of_means = frame_means.values().sum::<f64>() / frame_means.len() as f64;
        assert_relative_eq!(scores.video_score, 2.0 / 3.0);
        assert_relative_eq!(mean_of_means, 0.625);
    }

    #[test]
    fn test_frame_score_is_mean_of_covering_clips() {
        let mut acc = FrameScoreAccumulator::new();
        acc.add_clip(&clip(0.2, &[0, 1]));
        acc.add_clip(&clip(0.6, &[1, 2]));

        let scores = acc.finalize().unwrap();
        assert_relative_eq!(scores.frame_score(0).unwrap(), 0.2);
        assert_relative_eq!(scores.frame_score(1).unwrap(), 0.4);
        assert_relative_eq!(scores.frame_score(2).unwrap(), 0.6);
        assert_eq!(scores.frame_score(3), None);
    }

    #[test]
    fn test_repeated_frame_in_clip_counts_each_time() {
        let mut acc = FrameScoreAccumulator::new();
        acc.add_clip(&clip(0.3, &[5, 5, 5, 6]));

        let scores = acc.finalize().unwrap();
        assert_eq!(scores.per_frame[&5].scores, vec![0.3, 0.3, 0.3]);
        assert_eq!(scores.per_frame[&6].scores, vec![0.3]);
    }

    #[test]
    fn test_last_recorded_box_wins() {
        let mut acc = FrameScoreAccumulator::new();
        acc.record_box(4, [0, 0, 10, 10]);
        acc.record_box(4, [5, 5, 20, 20]);
        acc.add_clip(&clip(0.1, &[4]));

        let scores = acc.finalize().unwrap();
        assert_eq!(scores.bbox(4), Some([5, 5, 20, 20]));
    }

    #[test]
    fn test_frame_with_box_but_no_clip_has_no_score() {
        let mut acc = FrameScoreAccumulator::new();
        acc.record_box(9, [0, 0, 10, 10]);
        acc.add_clip(&clip(0.1, &[0]));

        let scores = acc.finalize().unwrap();
        assert_eq!(scores.frame_score(9), None);
        assert!(!scores.per_frame_scores().contains_key(&9));
        assert_eq!(scores.bbox(9), Some([0, 0, 10, 10]));
    }

    #[test]
    fn test_no_clips_fails() {
        let acc = FrameScoreAccumulator::new();
        assert_eq!(acc.finalize(), Err(ScoringError::NoClips));
    }
}
