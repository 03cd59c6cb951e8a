pub mod onnx_clip_classifier;
pub mod similarity_crop_aligner;
