use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use fakescan_core::detection::infrastructure::detection_file::DetectionFile;
use fakescan_core::detection::infrastructure::precomputed_tracker::PrecomputedFaceTracker;
use fakescan_core::pipeline::annotate_frames_use_case::AnnotateFramesUseCase;
use fakescan_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use fakescan_core::pipeline::score_report::ScoreReport;
use fakescan_core::pipeline::score_video_use_case::ScoreVideoUseCase;
use fakescan_core::pipeline::scoring_config::ScoringConfig;
use fakescan_core::scoring::domain::clip_windower::PaddingStrategy;
use fakescan_core::scoring::infrastructure::onnx_clip_classifier::OnnxClipClassifier;
use fakescan_core::scoring::infrastructure::similarity_crop_aligner::SimilarityCropAligner;
use fakescan_core::video::domain::video_reader::VideoReader;
use fakescan_core::video::infrastructure::image_file_writer::ImageFileWriter;
use fakescan_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

const DETECTIONS_FILE_NAME: &str = "detections.json";

/// Scores face tracks in a video for signs of manipulation.
#[derive(Parser)]
#[command(name = "fakescan")]
struct Cli {
    /// Directory holding the video's frames as images, in name order.
    input: PathBuf,

    /// Clip classifier model (ONNX).
    #[arg(long)]
    model: PathBuf,

    /// Face detections and tracks JSON (default: <input>/detections.json).
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Scoring config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Crops per clip.
    #[arg(long)]
    clip_size: Option<usize>,

    /// Side of the aligned face crop in pixels.
    #[arg(long)]
    image_size: Option<u32>,

    /// Margin around each face box, relative to box size.
    #[arg(long)]
    crop_scale: Option<f64>,

    /// Padding for tracks shorter than a clip: interior or reflect.
    #[arg(long)]
    padding: Option<PaddingStrategy>,

    /// Video score above which the video is reported as manipulated.
    #[arg(long)]
    threshold: Option<f64>,

    /// Read at most this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Write a JSON score report here.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write frames with scored face boxes drawn into this directory.
    #[arg(long)]
    annotate: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let config = build_config(&cli)?;

    let mut reader = ImageSequenceReader::new();
    let metadata = reader.open(&cli.input)?;
    let frames = reader.read(config.max_frames)?;
    reader.close();
    log::info!(
        "Read {} of {} frames ({}x{})",
        frames.len(),
        metadata.total_frames,
        metadata.width,
        metadata.height
    );

    let detections_path = cli
        .detections
        .clone()
        .unwrap_or_else(|| cli.input.join(DETECTIONS_FILE_NAME));
    let mut detections = DetectionFile::load(&detections_path)?;
    detections.truncate(frames.len());
    let mut tracker = PrecomputedFaceTracker::new(detections.tracks.clone());

    let classifier = OnnxClipClassifier::new(&cli.model)?;
    let aligner = SimilarityCropAligner::new(config.image_size);
    let mut use_case = ScoreVideoUseCase::new(
        &config,
        Box::new(aligner),
        Box::new(classifier),
        Box::new(StdoutPipelineLogger::default()),
    )?;
    let scores = use_case.execute(&mut tracker, &detections.frames, &frames)?;

    let input = cli.input.display().to_string();
    println!("{input} Score: {}", scores.video_score);

    let report = ScoreReport::new(&input, &scores, config.threshold);
    log::info!("Verdict: {} (threshold {})", report.verdict, config.threshold);
    if let Some(path) = &cli.report {
        report.write_json(path)?;
        log::info!("Report written to {}", path.display());
    }

    if let Some(dir) = &cli.annotate {
        let annotator = AnnotateFramesUseCase::new(Box::new(ImageFileWriter::new()), config.threshold);
        let boxed = annotator.execute(&frames, &scores, dir)?;
        log::info!("{boxed} frames carry a scored face box");
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<ScoringConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    apply_overrides(cli, &mut config);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(cli: &Cli, config: &mut ScoringConfig) {
    if let Some(v) = cli.clip_size {
        config.clip_size = v;
    }
    if let Some(v) = cli.image_size {
        config.image_size = v;
    }
    if let Some(v) = cli.crop_scale {
        config.crop_scale = v;
    }
    if let Some(v) = cli.padding {
        config.padding = v;
    }
    if let Some(v) = cli.threshold {
        config.threshold = v;
    }
    if let Some(v) = cli.max_frames {
        config.max_frames = v;
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_dir() {
        return Err(format!("Frame directory not found: {}", cli.input.display()).into());
    }
    if !cli.model.is_file() {
        return Err(format!("Model file not found: {}", cli.model.display()).into());
    }
    if let Some(path) = &cli.detections {
        require_file(path, "Detections file")?;
    }
    if let Some(path) = &cli.config {
        require_file(path, "Config file")?;
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("{what} not found: {}", path.display()).into());
    }
    Ok(())
}
