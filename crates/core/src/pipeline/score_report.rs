use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::domain::score_aggregator::VideoScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Authentic,
    Manipulated,
}

impl Verdict {
    /// Scores strictly above `threshold` are manipulated.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Verdict::Manipulated
        } else {
            Verdict::Authentic
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Authentic => write!(f, "authentic"),
            Verdict::Manipulated => write!(f, "manipulated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    /// Mean of `clip_scores`; absent when no clip covered the frame.
    pub score: Option<f64>,
    pub clip_scores: Vec<f64>,
    pub bbox: Option<[i32; 4]>,
}

/// Serializable outcome of scoring one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub input: String,
    pub video_score: f64,
    pub threshold: f64,
    pub verdict: Verdict,
    pub clip_count: usize,
    pub frames: Vec<FrameReport>,
}

impl ScoreReport {
    pub fn new(input: &str, scores: &VideoScores, threshold: f64) -> Self {
        let frames = scores
            .per_frame
            .iter()
            .map(|(&index, frame)| FrameReport {
                index,
                score: frame.mean(),
                clip_scores: frame.scores.clone(),
                bbox: frame.bbox,
            })
            .collect();

        Self {
            input: input.to_string(),
            video_score: scores.video_score,
            threshold,
            verdict: Verdict::from_score(scores.video_score, threshold),
            clip_count: scores.clip_count,
            frames,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::score_aggregator::{ClipScore, FrameScoreAccumulator};
    use rstest::rstest;

    fn scores() -> VideoScores {
        let mut acc = FrameScoreAccumulator::new();
        acc.record_box(0, [1, 2, 3, 4]);
        acc.record_box(2, [5, 6, 7, 8]);
        acc.add_clip(&ClipScore {
            score: 0.2,
            frame_indices: vec![0, 1],
        });
        acc.add_clip(&ClipScore {
            score: 0.4,
            frame_indices: vec![1],
        });
        acc.finalize().unwrap()
    }

    #[rstest]
    #[case(0.01, 0.002584857167676091, Verdict::Manipulated)]
    #[case(0.001, 0.002584857167676091, Verdict::Authentic)]
    #[case(0.5, 0.5, Verdict::Authentic)]
    fn test_verdict_from_score(
        #[case] score: f64,
        #[case] threshold: f64,
        #[case] expected: Verdict,
    ) {
        assert_eq!(Verdict::from_score(score, threshold), expected);
    }

    #[test]
    fn test_report_lists_frames_in_order() {
        let report = ScoreReport::new("video_frames", &scores(), 0.25);

        assert_eq!(report.verdict, Verdict::Manipulated);
        assert_eq!(report.clip_count, 2);
        let indices: Vec<usize> = report.frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(report.frames[1].clip_scores, vec![0.2, 0.4]);
        assert_eq!(report.frames[0].bbox, Some([1, 2, 3, 4]));
        assert_eq!(report.frames[2].score, None);
    }

    #[test]
    fn test_write_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let report = ScoreReport::new("clip", &scores(), 0.5);

        report.write_json(&path).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"verdict\": \"authentic\""));
        let back: ScoreReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
