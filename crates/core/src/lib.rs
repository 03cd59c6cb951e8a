pub mod detection;
pub mod pipeline;
pub mod scoring;
pub mod shared;
pub mod video;
