use ndarray::Array5;
use thiserror::Error;

use crate::shared::constants::{PIXEL_MEAN, PIXEL_STD};
use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipTensorError {
    #[error("clip has no images")]
    Empty,
    #[error("image {index} is {found:?}, expected {expected:?}")]
    SizeMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("image {index} has {channels} channels, expected 3")]
    Channels { index: usize, channels: u8 },
}

/// Stacks aligned RGB crops into a `(1, 3, T, H, W)` batch standardized
/// with `PIXEL_MEAN` and `PIXEL_STD`.
pub fn clip_tensor(images: &[Frame]) -> Result<Array5<f32>, ClipTensorError> {
    let first = images.first().ok_or(ClipTensorError::Empty)?;
    let expected = (first.width(), first.height());

    for (index, image) in images.iter().enumerate() {
        let found = (image.width(), image.height());
        if found != expected {
            return Err(ClipTensorError::SizeMismatch {
                index,
                expected,
                found,
            });
        }
        if image.channels() != 3 {
            return Err(ClipTensorError::Channels {
                index,
                channels: image.channels(),
            });
        }
    }

    let (w, h) = (expected.0 as usize, expected.1 as usize);
    let mut tensor = Array5::<f32>::zeros((1, 3, images.len(), h, w));
    for (t, image) in images.iter().enumerate() {
        let pixels = image.as_ndarray();
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    tensor[[0, c, t, y, x]] =
                        (pixels[[y, x, c]] as f32 - PIXEL_MEAN[c]) / PIXEL_STD[c];
                }
            }
        }
    }
    Ok(tensor)
}
