pub mod clip_classifier;
pub mod clip_tensor;
pub mod clip_windower;
pub mod crop_aligner;
pub mod crop_normalizer;
pub mod face_geometry;
pub mod score_aggregator;
pub mod scoring_error;
pub mod track_store;
