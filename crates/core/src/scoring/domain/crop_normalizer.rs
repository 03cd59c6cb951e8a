use thiserror::Error;

use crate::detection::domain::face_detection::{BBox, FaceDetection, Point};
use crate::shared::constants::DEFAULT_CROP_SCALE;
use crate::shared::frame::Frame;

use super::face_geometry::{CropBox, FaceGeometry};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CropError {
    #[error("crop box ({}, {})-({}, {}) has no area", .crop_box.x1, .crop_box.y1, .crop_box.x2, .crop_box.y2)]
    Degenerate { crop_box: CropBox },
}

/// Cuts an enlarged region around each face and moves its geometry into
/// crop-local coordinates.
#[derive(Clone, Debug)]
pub struct CropNormalizer {
    scale: f64,
}

impl CropNormalizer {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Enlarged crop rectangle for `bbox` inside a `width` × `height` frame.
    ///
    /// The rounded box grows by `scale` times its size on every side, then
    /// x is clamped to `[0, width - 1]` and y to `[0, height - 1]`. Halves
    /// round to even in both rounding steps.
    pub fn crop_box(&self, bbox: &BBox, width: u32, height: u32) -> Result<CropBox, CropError> {
        let [x1, y1, x2, y2] = bbox.map(f64::round_ties_even);
        let pad_x = (x2 - x1) * self.scale;
        let pad_y = (y2 - y1) * self.scale;
        let max_x = (width.max(1) - 1) as f64;
        let max_y = (height.max(1) - 1) as f64;

        let crop_box = CropBox {
            x1: (x1 - pad_x).clamp(0.0, max_x).round_ties_even() as i32,
            y1: (y1 - pad_y).clamp(0.0, max_y).round_ties_even() as i32,
            x2: (x2 + pad_x).clamp(0.0, max_x).round_ties_even() as i32,
            y2: (y2 + pad_y).clamp(0.0, max_y).round_ties_even() as i32,
        };
        if crop_box.is_degenerate() {
            return Err(CropError::Degenerate { crop_box });
        }
        Ok(crop_box)
    }

    /// Crops `frame` around `detection` and returns the crop with its
    /// crop-local geometry.
    pub fn normalize(
        &self,
        detection: &FaceDetection,
        frame: &Frame,
    ) -> Result<(Frame, FaceGeometry), CropError> {
        let crop_box = self.crop_box(&detection.bbox, frame.width(), frame.height())?;
        let origin = (crop_box.x1 as f64, crop_box.y1 as f64);
        let extent = (crop_box.width() as f64, crop_box.height() as f64);
        let to_local = |p: &Point| localize(*p, origin, extent);

        let [bx1, by1, bx2, by2] = detection.bbox;
        let (lx1, ly1) = to_local(&(bx1, by1));
        let (lx2, ly2) = to_local(&(bx2, by2));

        let geometry = FaceGeometry {
            bbox: [lx1, ly1, lx2, ly2],
            landmarks5: detection.landmarks5.map(|p| to_local(&p)),
            landmarks68: detection.landmarks68.iter().map(to_local).collect(),
            crop_box,
        };

        let image = frame.crop(
            crop_box.x1 as u32,
            crop_box.y1 as u32,
            crop_box.x2 as u32,
            crop_box.y2 as u32,
        );
        Ok((image, geometry))
    }
}

impl Default for CropNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CROP_SCALE)
    }
}

fn localize(point: Point, origin: Point, extent: Point) -> Point {
    (
        (point.0 - origin.0).clamp(0.0, extent.0),
        (point.1 - origin.1).clamp(0.0, extent.1),
    )
}
