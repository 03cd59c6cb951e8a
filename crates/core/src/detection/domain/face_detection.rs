use serde::{Deserialize, Serialize};

/// Bounding box as `[x1, y1, x2, y2]` in frame pixels.
pub type BBox = [f64; 4];

/// A landmark in pixel coordinates.
pub type Point = (f64, f64);

/// Number of points in the dense landmark set.
pub const DENSE_LANDMARK_COUNT: usize = 68;

/// One face found in one frame by the external detector.
///
/// `landmarks5` follows the usual eye/eye/nose/mouth/mouth order;
/// `landmarks68` is the dense iBUG layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bbox: BBox,
    pub landmarks5: [Point; 5],
    pub landmarks68: Vec<Point>,
    pub score: f64,
}

impl FaceDetection {
    pub fn width(&self) -> f64 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f64 {
        self.bbox[3] - self.bbox[1]
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Box rounded to whole pixels, used as the per-frame representative box.
    pub fn rounded_box(&self) -> [i32; 4] {
        self.bbox.map(|v| v.round_ties_even() as i32)
    }

    pub fn iou(&self, other: &FaceDetection) -> f64 {
        let a = &self.bbox;
        let b = &other.bbox;
        let x1 = a[0].max(b[0]);
        let y1 = a[1].max(b[1]);
        let x2 = a[2].min(b[2]);
        let y2 = a[3].min(b[3]);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}
