use std::path::Path;

use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::scoring::domain::score_aggregator::VideoScores;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

use super::score_report::Verdict;

const MANIPULATED_COLOR: [u8; 3] = [255, 0, 0];
const AUTHENTIC_COLOR: [u8; 3] = [0, 255, 0];
const BOX_THICKNESS: i32 = 2;

/// Writes every frame as an image, outlining the face box of each scored
/// frame in red (above threshold) or green.
pub struct AnnotateFramesUseCase {
    image_writer: Box<dyn ImageWriter>,
    threshold: f64,
}

impl AnnotateFramesUseCase {
    pub fn new(image_writer: Box<dyn ImageWriter>, threshold: f64) -> Self {
        Self {
            image_writer,
            threshold,
        }
    }

    /// Writes `frame_00000.png`, `frame_00001.png`, ... into `output_dir`
    /// and returns how many frames received a box.
    pub fn execute(
        &self,
        frames: &[Frame],
        scores: &VideoScores,
        output_dir: &Path,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let mut annotated = 0;
        for frame in frames {
            let index = frame.index();
            let path = output_dir.join(format!("frame_{index:05}.png"));
            match (scores.frame_score(index), scores.bbox(index)) {
                (Some(score), Some(bbox)) => {
                    let color = match Verdict::from_score(score, self.threshold) {
                        Verdict::Manipulated => MANIPULATED_COLOR,
                        Verdict::Authentic => AUTHENTIC_COLOR,
                    };
                    self.image_writer.write(&path, &draw_box(frame, bbox, color))?;
                    annotated += 1;
                }
                _ => self.image_writer.write(&path, frame)?,
            }
        }
        log::info!(
            "Wrote {} annotated frames to {}",
            frames.len(),
            output_dir.display()
        );
        Ok(annotated)
    }
}

/// Returns a copy of `frame` with a `BOX_THICKNESS` outline around the
/// inclusive box `bbox`. Non-RGB frames come back unchanged.
fn draw_box(frame: &Frame, bbox: [i32; 4], color: [u8; 3]) -> Frame {
    let Some(mut image) = frame.to_rgb_image() else {
        return frame.clone();
    };
    let [x1, y1, x2, y2] = clamp_near_frame(bbox, image.width(), image.height());
    for t in 0..BOX_THICKNESS {
        let width = x2 - x1 + 1 - 2 * t;
        let height = y2 - y1 + 1 - 2 * t;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(x1 + t, y1 + t).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(&mut image, rect, Rgb(color));
    }
    Frame::from_rgb_image(image, frame.index())
}

/// Pulls box edges to within `BOX_THICKNESS` of the frame so sides lying
/// outside the frame stay outside.
fn clamp_near_frame(bbox: [i32; 4], width: u32, height: u32) -> [i32; 4] {
    let max_x = i32::try_from(width).unwrap_or(i32::MAX - BOX_THICKNESS) + BOX_THICKNESS;
    let max_y = i32::try_from(height).unwrap_or(i32::MAX - BOX_THICKNESS) + BOX_THICKNESS;
    let [x1, y1, x2, y2] = bbox;
    [
        x1.clamp(-BOX_THICKNESS, max_x),
        y1.clamp(-BOX_THICKNESS, max_y),
        x2.clamp(-BOX_THICKNESS, max_x),
        y2.clamp(-BOX_THICKNESS, max_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::score_aggregator::{ClipScore, FrameScoreAccumulator};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct RecordingWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    fn frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame::new(vec![0; 20 * 20 * 3], 20, 20, 3, i))
            .collect()
    }

    fn scores() -> VideoScores {
        let mut acc = FrameScoreAccumulator::new();
        acc.record_box(0, [2, 2, 10, 10]);
        acc.record_box(1, [4, 4, 12, 12]);
        acc.record_box(2, [0, 0, 5, 5]);
        acc.add_clip(&ClipScore {
            score: 0.9,
            frame_indices: vec![0],
        });
        acc.add_clip(&ClipScore {
            score: 0.0,
            frame_indices: vec![1],
        });
        acc.finalize().unwrap()
    }

    fn run(threshold: f64) -> (usize, Vec<(PathBuf, Frame)>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let writer = RecordingWriter {
            written: written.clone(),
        };
        let uc = AnnotateFramesUseCase::new(Box::new(writer), threshold);
        let count = uc.execute(&frames(3), &scores(), Path::new("/out")).unwrap();
        let frames = written.lock().unwrap().clone();
        (count, frames)
    }

    #[test]
    fn test_every_frame_written_with_padded_name() {
        let (_, written) = run(0.5);
        let names: Vec<PathBuf> = written.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("/out/frame_00000.png"),
                PathBuf::from("/out/frame_00001.png"),
                PathBuf::from("/out/frame_00002.png"),
            ]
        );
    }

    #[test]
    fn test_box_color_follows_threshold() {
        let (count, written) = run(0.5);
        assert_eq!(count, 2);

        let manipulated = written[0].1.as_ndarray();
        assert_eq!(
            [manipulated[[2, 5, 0]], manipulated[[2, 5, 1]], manipulated[[2, 5, 2]]],
            MANIPULATED_COLOR
        );
        let authentic = written[1].1.as_ndarray();
        assert_eq!(
            [authentic[[4, 8, 0]], authentic[[4, 8, 1]], authentic[[4, 8, 2]]],
            AUTHENTIC_COLOR
        );
    }

    #[test]
    fn test_unscored_frame_left_untouched() {
        let (_, written) = run(0.5);
        assert!(written[2].1.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_box_interior_untouched() {
        let (_, written) = run(0.5);
        assert_eq!(written[0].1.as_ndarray()[[6, 6, 0]], 0);
    }

    #[test]
    fn test_box_outside_frame_is_clipped() {
        let frame = Frame::new(vec![0; 10 * 10 * 3], 10, 10, 3, 0);
        let framed = draw_box(&frame, [-5, -5, 50, 50], [9, 9, 9]);
        assert!(framed.data().iter().all(|&v| v == 0));

        let banded = draw_box(&framed, [-5, 3, 50, 6], [9, 9, 9]);
        assert_eq!(banded.as_ndarray()[[3, 0, 0]], 9);
        assert_eq!(banded.as_ndarray()[[6, 9, 0]], 9);
        assert_eq!(banded.as_ndarray()[[2, 0, 0]], 0);
    }

    #[test]
    fn test_huge_box_is_clamped_before_drawing() {
        let frame = Frame::new(vec![0; 20 * 20 * 3], 20, 20, 3, 4);
        let drawn = draw_box(&frame, [i32::MIN, 0, i32::MAX, 10], [7, 7, 7]);

        let pixels = drawn.as_ndarray();
        assert!((0..20).all(|x| pixels[[0, x, 0]] == 7 && pixels[[10, x, 0]] == 7));
        assert_eq!(pixels[[5, 0, 0]], 0);
        assert_eq!(drawn.index(), 4);
    }

    #[test]
    fn test_inverted_box_draws_nothing() {
        let frame = Frame::new(vec![0; 10 * 10 * 3], 10, 10, 3, 0);
        let drawn = draw_box(&frame, [8, 8, 2, 2], [9, 9, 9]);
        assert!(drawn.data().iter().all(|&v| v == 0));
    }
}
