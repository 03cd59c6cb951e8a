pub mod annotate_frames_use_case;
pub mod inference_driver;
pub mod pipeline_logger;
pub mod score_report;
pub mod score_video_use_case;
pub mod scoring_config;
pub mod track_resolution;
