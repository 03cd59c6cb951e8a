use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Reads a video stored as a directory of still images, one per frame.
///
/// Frames are ordered by file name, so names should be zero-padded
/// (`frame_00001.png`, ...). Files without an image extension are ignored.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    metadata: Option<VideoMetadata>,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            metadata: None,
        }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

impl VideoReader for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let paths = list_images(path)?;
        let first = paths
            .first()
            .ok_or_else(|| format!("no image frames found in {}", path.display()))?;
        let (width, height) = image::image_dimensions(first)?;

        let metadata = VideoMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        log::debug!(
            "Opened {} frames of {width}x{height} from {}",
            paths.len(),
            path.display()
        );

        self.paths = paths;
        self.metadata = Some(metadata.clone());
        Ok(metadata)
    }

    fn read(&mut self, max_frames: usize) -> Result<Vec<Frame>, Box<dyn std::error::Error>> {
        let metadata = self
            .metadata
            .as_ref()
            .ok_or("ImageSequenceReader: not opened")?;

        self.paths
            .iter()
            .take(max_frames)
            .enumerate()
            .map(|(index, path)| -> Result<Frame, Box<dyn std::error::Error>> {
                let img = image::open(path)?.to_rgb8();
                if img.dimensions() != (metadata.width, metadata.height) {
                    return Err(format!(
                        "{} is {}x{}, expected {}x{}",
                        path.display(),
                        img.width(),
                        img.height(),
                        metadata.width,
                        metadata.height
                    )
                    .into());
                }
                Ok(Frame::from_rgb_image(img, index))
            })
            .collect()
    }

    fn close(&mut self) {
        self.paths.clear();
        self.metadata = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frames(dir: &Path, names: &[&str], width: u32, height: u32) {
        for (i, name) in names.iter().enumerate() {
            let mut img = image::RgbImage::new(width, height);
            for pixel in img.pixels_mut() {
                *pixel = image::Rgb([i as u8 * 10, 100, 200]);
            }
            img.save(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn test_open_returns_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["f_000.png", "f_001.png", "f_002.png"], 40, 30);

        let mut reader = ImageSequenceReader::new();
        let meta = reader.open(dir.path()).unwrap();
        assert_eq!((meta.width, meta.height), (40, 30));
        assert_eq!(meta.total_frames, 3);
        assert_eq!(meta.source_path, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_frames_sorted_by_name_and_indexed() {
        let dir = tempfile::tempdir().unwrap();
        // Written in reverse so the fill value tells the write order apart
        write_frames(dir.path(), &["f_002.png", "f_001.png", "f_000.png"], 4, 4);

        let mut reader = ImageSequenceReader::new();
        reader.open(dir.path()).unwrap();
        let frames = reader.read(10).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].index(), 0);
        assert_eq!(frames[2].index(), 2);
        assert_eq!(frames[0].data()[0], 20);
        assert_eq!(frames[2].data()[0], 0);
    }

    #[test]
    fn test_read_respects_max_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["a.png", "b.png", "c.png", "d.png"], 4, 4);

        let mut reader = ImageSequenceReader::new();
        reader.open(dir.path()).unwrap();
        assert_eq!(reader.read(2).unwrap().len(), 2);
    }

    #[test]
    fn test_non_image_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["a.png"], 4, 4);
        std::fs::write(dir.path().join("detections.json"), "{}").unwrap();

        let mut reader = ImageSequenceReader::new();
        assert_eq!(reader.open(dir.path()).unwrap().total_frames, 1);
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = ImageSequenceReader::new();
        assert!(reader.open(dir.path()).is_err());
    }

    #[test]
    fn test_mismatched_frame_size_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["a.png"], 4, 4);
        write_frames(dir.path(), &["b.png"], 8, 4);

        let mut reader = ImageSequenceReader::new();
        reader.open(dir.path()).unwrap();
        assert!(reader.read(10).is_err());
    }

    #[test]
    fn test_read_without_open_is_error() {
        let mut reader = ImageSequenceReader::new();
        assert!(reader.read(1).is_err());
    }

    #[test]
    fn test_close_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["a.png"], 4, 4);
        let mut reader = ImageSequenceReader::new();
        reader.open(dir.path()).unwrap();
        reader.close();
        assert!(reader.read(1).is_err());
    }
}
