use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for scoring progress and per-stage cost.
///
/// Events arrive in video sections: `begin_video`, any number of
/// progress/timing/metric events, then `finish_video` once the video
/// score is known. A video that fails leaves its section open until the
/// next `begin_video` replaces it.
pub trait PipelineLogger: Send {
    fn begin_video(&mut self, track_count: usize, frame_count: usize);

    /// Report clip-level progress within the current video.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one clip.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-video metric such as clips per track.
    fn metric(&mut self, name: &str, value: f64);

    fn finish_video(&mut self, video_score: f64, clip_count: usize);
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn begin_video(&mut self, _track_count: usize, _frame_count: usize) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn finish_video(&mut self, _video_score: f64, _clip_count: usize) {}
}

/// Running count, sum and range of one series of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleStats {
    fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

struct VideoSection {
    number: usize,
    started: Instant,
    track_count: usize,
    frame_count: usize,
    stages: BTreeMap<String, SampleStats>,
    metrics: BTreeMap<String, SampleStats>,
}

impl VideoSection {
    fn new(number: usize, track_count: usize, frame_count: usize) -> Self {
        Self {
            number,
            started: Instant::now(),
            track_count,
            frame_count,
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }
}

/// Logs throttled clip progress through `log` and closes every video
/// with a summary of that video's stage costs and metrics.
pub struct StdoutPipelineLogger {
    throttle_clips: usize,
    videos: usize,
    section: Option<VideoSection>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_clips: usize) -> Self {
        Self {
            throttle_clips: throttle_clips.max(1),
            videos: 0,
            section: None,
        }
    }

    /// Number of videos begun so far.
    pub fn videos(&self) -> usize {
        self.videos
    }

    pub fn stage(&self, name: &str) -> Option<SampleStats> {
        self.section.as_ref()?.stages.get(name).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<SampleStats> {
        self.section.as_ref()?.metrics.get(name).copied()
    }

    /// Summary of the open video section, or `None` outside a section.
    pub fn section_summary(&self, video_score: f64, clip_count: usize) -> Option<String> {
        let section = self.section.as_ref()?;
        let elapsed_s = section.started.elapsed().as_secs_f64();
        let mut header = format!(
            "Video {}: score {video_score:.6} from {clip_count} clips ({} tracks, {} frames) in {elapsed_s:.1}s",
            section.number, section.track_count, section.frame_count
        );
        if clip_count > 0 && elapsed_s > 0.0 {
            header.push_str(&format!(", {:.1} clips/s", clip_count as f64 / elapsed_s));
        }

        let mut lines = vec![header];
        for (stage, stats) in &section.stages {
            lines.push(format!(
                "  {stage:10} mean {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }
        for (name, stats) in &section.metrics {
            lines.push(format!(
                "  {name}: min {} mean {:.1} max {}",
                stats.min,
                stats.mean(),
                stats.max
            ));
        }
        Some(lines.join("\n"))
    }

    fn section_mut(&mut self) -> &mut VideoSection {
        let number = self.videos;
        self.section
            .get_or_insert_with(|| VideoSection::new(number, 0, 0))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn begin_video(&mut self, track_count: usize, frame_count: usize) {
        self.videos += 1;
        self.section = Some(VideoSection::new(self.videos, track_count, frame_count));
        log::info!(
            "Video {}: scoring {track_count} face tracks over {frame_count} frames",
            self.videos
        );
    }

    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 && (current % self.throttle_clips == 0 || current == total) {
            let number = self.section_mut().number;
            log::info!("Video {number}: {current}/{total} clips");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.section_mut()
            .stages
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.section_mut()
            .metrics
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    fn finish_video(&mut self, video_score: f64, clip_count: usize) {
        if let Some(text) = self.section_summary(video_score, clip_count) {
            log::info!("\n{text}");
        }
        self.section = None;
    }
}
