//! Fallback track builder used when the tracker finds nothing.
//!
//! Links detections frame to frame by greedy IoU and keeps the longest
//! unbroken chain, so a video with at least one detection always yields
//! one scorable track.

use super::face_detection::FaceDetection;
use super::face_track::FaceTrack;

/// Minimum IoU for a detection to continue the previous frame's face.
pub const CHAIN_IOU_THRESHOLD: f64 = 0.3;

type Chain = (usize, Vec<FaceDetection>);

/// Longest chain of same-face detections across consecutive frames.
///
/// A chain starts on the most confident face of a frame and continues with
/// the best-overlapping face of each following frame. It breaks on a frame
/// with no face above `CHAIN_IOU_THRESHOLD`. Ties keep the earliest chain.
/// Returns `None` only when there are no detections at all.
pub fn find_longest(detections: &[Vec<FaceDetection>]) -> Option<FaceTrack> {
    let mut best: Option<Chain> = None;
    let mut current: Option<Chain> = None;

    for (frame_index, faces) in detections.iter().enumerate() {
        if let Some((_, chain)) = current.as_mut() {
            let next = chain
                .last()
                .and_then(|prev| best_continuation(prev, faces))
                .cloned();
            if let Some(face) = next {
                chain.push(face);
                continue;
            }
        }

        keep_longer(&mut best, current.take());
        current = most_confident(faces).map(|face| (frame_index, vec![face.clone()]));
    }
    keep_longer(&mut best, current);

    best.map(|(start, chain)| FaceTrack::spanning(start, chain))
}

fn best_continuation<'a>(
    prev: &FaceDetection,
    faces: &'a [FaceDetection],
) -> Option<&'a FaceDetection> {
    faces
        .iter()
        .map(|f| (f, prev.iou(f)))
        .filter(|(_, iou)| *iou >= CHAIN_IOU_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(f, _)| f)
}

fn most_confident(faces: &[FaceDetection]) -> Option<&FaceDetection> {
    faces.iter().max_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn keep_longer(best: &mut Option<Chain>, candidate: Option<Chain>) {
    let Some(candidate) = candidate else {
        return;
    };
    let longer = best
        .as_ref()
        .map_or(true, |(_, chain)| candidate.1.len() > chain.len());
    if longer {
        *best = Some(candidate);
    }
}
