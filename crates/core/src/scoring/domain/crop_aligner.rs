use crate::shared::frame::Frame;

use super::face_geometry::FaceGeometry;

/// Domain interface for warping a clip's face crops into a canonical pose.
///
/// Receives the crops of one clip in order and returns the same number of
/// images, all with identical dimensions, plus their geometry in the
/// aligned coordinate frame.
pub trait CropAligner: Send {
    fn align(
        &self,
        geometries: &[FaceGeometry],
        images: &[Frame],
    ) -> Result<(Vec<FaceGeometry>, Vec<Frame>), Box<dyn std::error::Error>>;
}
