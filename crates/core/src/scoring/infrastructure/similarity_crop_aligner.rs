//! Five-point similarity alignment of face crops.
//!
//! Each crop is warped so its eyes, nose and mouth corners land on the
//! ArcFace reference positions, scaled to the requested output size.

use crate::detection::domain::face_detection::Point;
use crate::scoring::domain::crop_aligner::CropAligner;
use crate::scoring::domain::face_geometry::FaceGeometry;
use crate::shared::frame::Frame;

/// ArcFace reference landmarks for a 112×112 output.
const REFERENCE_LANDMARKS_112: [Point; 5] = [
    (38.2946, 51.6963),
    (73.5318, 51.5014),
    (56.0252, 71.7366),
    (41.5493, 92.3655),
    (70.7299, 92.2041),
];

const REFERENCE_SIZE: f64 = 112.0;

/// Landmark spreads below this are treated as collapsed.
const MIN_LANDMARK_SPREAD: f64 = 1e-6;

/// 2D similarity `p' = [[a, -b], [b, a]] · p + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Similarity {
    a: f64,
    b: f64,
    tx: f64,
    ty: f64,
}

impl Similarity {
    /// Least-squares similarity taking `src` onto `dst`, or `None` when
    /// the source points collapse to a single location.
    fn estimate(src: &[Point; 5], dst: &[Point; 5]) -> Option<Self> {
        let n = src.len() as f64;
        let (msx, msy) = centroid(src);
        let (mdx, mdy) = centroid(dst);

        let mut spread = 0.0;
        let mut dot = 0.0;
        let mut cross = 0.0;
        for (s, d) in src.iter().zip(dst.iter()) {
            let (sx, sy) = (s.0 - msx, s.1 - msy);
            let (dx, dy) = (d.0 - mdx, d.1 - mdy);
            spread += sx * sx + sy * sy;
            dot += sx * dx + sy * dy;
            cross += sx * dy - sy * dx;
        }
        if spread / n < MIN_LANDMARK_SPREAD {
            return None;
        }

        let a = dot / spread;
        let b = cross / spread;
        Some(Self {
            a,
            b,
            tx: mdx - (a * msx - b * msy),
            ty: mdy - (b * msx + a * msy),
        })
    }

    /// Uniform scale from a `src_w` × `src_h` image to `size` × `size`.
    fn stretch(src_w: u32, src_h: u32, size: u32) -> (f64, f64) {
        (
            size as f64 / src_w.max(1) as f64,
            size as f64 / src_h.max(1) as f64,
        )
    }

    fn apply(&self, p: Point) -> Point {
        (
            self.a * p.0 - self.b * p.1 + self.tx,
            self.b * p.0 + self.a * p.1 + self.ty,
        )
    }

    fn invert(&self, p: Point) -> Option<Point> {
        let det = self.a * self.a + self.b * self.b;
        if det < f64::EPSILON {
            return None;
        }
        let (dx, dy) = (p.0 - self.tx, p.1 - self.ty);
        Some((
            (self.a * dx + self.b * dy) / det,
            (-self.b * dx + self.a * dy) / det,
        ))
    }
}

/// Warps crops onto the ArcFace template at `size` × `size` pixels.
///
/// Crops whose landmarks collapse to a point are resized instead, so every
/// output has the same dimensions.
pub struct SimilarityCropAligner {
    size: u32,
    reference: [Point; 5],
}

impl SimilarityCropAligner {
    pub fn new(size: u32) -> Self {
        let scale = size as f64 / REFERENCE_SIZE;
        Self {
            size,
            reference: REFERENCE_LANDMARKS_112.map(|(x, y)| (x * scale, y * scale)),
        }
    }

    fn align_one(&self, geometry: &FaceGeometry, image: &Frame) -> (FaceGeometry, Frame) {
        match Similarity::estimate(&geometry.landmarks5, &self.reference) {
            Some(transform) => {
                let aligned = warp(image, self.size, |p| transform.invert(p));
                (map_geometry(geometry, |p| transform.apply(p)), aligned)
            }
            None => {
                log::debug!(
                    "Collapsed landmarks on frame {}, resizing crop instead",
                    image.index()
                );
                let (sx, sy) = Similarity::stretch(image.width(), image.height(), self.size);
                let resized = warp(image, self.size, |(x, y)| Some((x / sx, y / sy)));
                (map_geometry(geometry, |(x, y)| (x * sx, y * sy)), resized)
            }
        }
    }
}

impl CropAligner for SimilarityCropAligner {
    fn align(
        &self,
        geometries: &[FaceGeometry],
        images: &[Frame],
    ) -> Result<(Vec<FaceGeometry>, Vec<Frame>), Box<dyn std::error::Error>> {
        if geometries.len() != images.len() {
            return Err(format!(
                "{} geometries for {} images",
                geometries.len(),
                images.len()
            )
            .into());
        }
        if let Some(image) = images.iter().find(|i| i.channels() != 3) {
            return Err(format!(
                "crop from frame {} has {} channels, expected RGB",
                image.index(),
                image.channels()
            )
            .into());
        }

        Ok(geometries
            .iter()
            .zip(images.iter())
            .map(|(g, i)| self.align_one(g, i))
            .unzip())
    }
}

fn centroid(points: &[Point; 5]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
    (sx / n, sy / n)
}

/// Applies `f` to every point; the box becomes the bounds of its mapped corners.
fn map_geometry(geometry: &FaceGeometry, f: impl Fn(Point) -> Point) -> FaceGeometry {
    let [x1, y1, x2, y2] = geometry.bbox;
    let corners = [(x1, y1), (x2, y1), (x1, y2), (x2, y2)].map(&f);
    let xs = corners.map(|c| c.0);
    let ys = corners.map(|c| c.1);
    let min = |v: [f64; 4]| v.into_iter().fold(f64::INFINITY, f64::min);
    let max = |v: [f64; 4]| v.into_iter().fold(f64::NEG_INFINITY, f64::max);

    FaceGeometry {
        bbox: [min(xs), min(ys), max(xs), max(ys)],
        landmarks5: geometry.landmarks5.map(&f),
        landmarks68: geometry.landmarks68.iter().map(|p| f(*p)).collect(),
        crop_box: geometry.crop_box,
    }
}

/// Fills a `size` × `size` RGB image by sampling `src` bilinearly at
/// `source_of(output_pixel)`. Samples outside `src` are black.
fn warp(src: &Frame, size: u32, source_of: impl Fn(Point) -> Option<Point>) -> Frame {
    let pixels = src.as_ndarray();
    let (w, h) = (src.width() as i64, src.height() as i64);
    let sample = |x: i64, y: i64, c: usize| -> f64 {
        if x >= 0 && x < w && y >= 0 && y < h {
            pixels[[y as usize, x as usize, c]] as f64
        } else {
            0.0
        }
    };

    let mut data = vec![0u8; (size * size * 3) as usize];
    for oy in 0..size {
        for ox in 0..size {
            let Some((sx, sy)) = source_of((ox as f64, oy as f64)) else {
                continue;
            };
            let x0 = sx.floor() as i64;
            let y0 = sy.floor() as i64;
            let fx = sx - x0 as f64;
            let fy = sy - y0 as f64;

            let offset = ((oy * size + ox) * 3) as usize;
            for c in 0..3 {
                let value = sample(x0, y0, c) * (1.0 - fx) * (1.0 - fy)
                    + sample(x0 + 1, y0, c) * fx * (1.0 - fy)
                    + sample(x0, y0 + 1, c) * (1.0 - fx) * fy
                    + sample(x0 + 1, y0 + 1, c) * fx * fy;
                data[offset + c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Frame::new(data, size, size, 3, src.index())
}
