pub mod detection_file;
pub mod precomputed_tracker;
