pub mod face_detection;
pub mod face_track;
pub mod face_tracker;
pub mod longest_track;
