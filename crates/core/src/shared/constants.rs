/// Frames per clip fed to the temporal classifier.
pub const DEFAULT_CLIP_SIZE: usize = 32;

/// Side length of the square aligned face crops.
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Extra margin added on each side of a face box, relative to box size.
pub const DEFAULT_CROP_SCALE: f64 = 0.5;

/// Video scores above this value are reported as manipulated.
pub const DEFAULT_THRESHOLD: f64 = 0.002584857167676091;

/// Frames read from the start of a video before the rest are ignored.
pub const DEFAULT_MAX_FRAMES: usize = 300;

/// Classifier output field holding the clip score.
pub const FINAL_OUTPUT_NAME: &str = "final_output";

/// ImageNet channel statistics on the 0–255 scale (RGB order).
pub const PIXEL_MEAN: [f32; 3] = [123.675, 116.28, 103.53];
pub const PIXEL_STD: [f32; 3] = [58.395, 57.12, 57.375];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
