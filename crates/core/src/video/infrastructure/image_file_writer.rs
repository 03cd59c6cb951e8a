use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves RGB frames through the `image` crate.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let img = frame.to_rgb_image().ok_or_else(|| {
            format!(
                "frame {} has {} channels, only RGB can be saved",
                frame.index(),
                frame.channels()
            )
        })?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        Frame::new(rgb.repeat((width * height) as usize), width, height, 3, 0)
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated").join("frame_00000.png");
        ImageFileWriter::new()
            .write(&path, &solid(20, 10, [1, 2, 3]))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_png_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &solid(8, 6, [50, 100, 200]))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(img.get_pixel(7, 5).0, [50, 100, 200]);
    }

    #[test]
    fn test_non_rgb_frame_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gray = Frame::new(vec![0; 4], 2, 2, 1, 3);
        let result = ImageFileWriter::new().write(&dir.path().join("g.png"), &gray);
        assert!(result.is_err());
    }
}
