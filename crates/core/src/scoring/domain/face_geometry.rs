use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detection::{BBox, Point};

/// Integer crop rectangle in frame pixels, half-open on the right and bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CropBox {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Face geometry expressed relative to the top-left corner of its crop.
///
/// `crop_box` keeps the crop's position in the source frame so callers can
/// map results back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceGeometry {
    pub bbox: BBox,
    pub landmarks5: [Point; 5],
    pub landmarks68: Vec<Point>,
    pub crop_box: CropBox,
}
