use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::domain::clip_windower::PaddingStrategy;
use crate::shared::constants::{
    DEFAULT_CLIP_SIZE, DEFAULT_CROP_SCALE, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_FRAMES,
    DEFAULT_THRESHOLD,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for scoring one video. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Crops per clip fed to the classifier.
    pub clip_size: usize,
    /// Side of the square aligned crop, in pixels.
    pub image_size: u32,
    /// Margin around each face box, as a fraction of the box size per side.
    pub crop_scale: f64,
    pub padding: PaddingStrategy,
    /// Video scores above this are reported as manipulated.
    pub threshold: f64,
    pub max_frames: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            clip_size: DEFAULT_CLIP_SIZE,
            image_size: DEFAULT_IMAGE_SIZE,
            crop_scale: DEFAULT_CROP_SCALE,
            padding: PaddingStrategy::default(),
            threshold: DEFAULT_THRESHOLD,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ScoringConfig =
            serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clip_size == 0 {
            return Err(invalid("clip_size", "must be at least 1"));
        }
        if self.image_size == 0 {
            return Err(invalid("image_size", "must be at least 1"));
        }
        if !self.crop_scale.is_finite() || self.crop_scale < 0.0 {
            return Err(invalid("crop_scale", "must be a non-negative number"));
        }
        if !self.threshold.is_finite() {
            return Err(invalid("threshold", "must be a finite number"));
        }
        if self.max_frames == 0 {
            return Err(invalid("max_frames", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("config.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.clip_size, 32);
        assert_eq!(config.image_size, 224);
        assert_eq!(config.crop_scale, 0.5);
        assert_eq!(config.padding, PaddingStrategy::Interior);
        assert_eq!(config.threshold, 0.002584857167676091);
        assert_eq!(config.max_frames, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"clip_size": 16, "padding": "reflect"}"#);

        let config = ScoringConfig::load(&path).unwrap();
        assert_eq!(config.clip_size, 16);
        assert_eq!(config.padding, PaddingStrategy::Reflect);
        assert_eq!(config.max_frames, 300);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoringConfig {
            clip_size: 8,
            threshold: 0.5,
            ..ScoringConfig::default()
        };
        let path = write_config(dir.path(), &serde_json::to_string_pretty(&config).unwrap());
        assert_eq!(ScoringConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_padding_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"padding": "wrap"}"#);
        assert!(matches!(
            ScoringConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        assert!(matches!(
            ScoringConfig::load(Path::new("/nonexistent/config.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[rstest]
    #[case(ScoringConfig { clip_size: 0, ..ScoringConfig::default() }, "clip_size")]
    #[case(ScoringConfig { image_size: 0, ..ScoringConfig::default() }, "image_size")]
    #[case(ScoringConfig { crop_scale: -0.1, ..ScoringConfig::default() }, "crop_scale")]
    #[case(ScoringConfig { threshold: f64::NAN, ..ScoringConfig::default() }, "threshold")]
    #[case(ScoringConfig { max_frames: 0, ..ScoringConfig::default() }, "max_frames")]
    fn test_validate_rejects(#[case] config: ScoringConfig, #[case] expected: &str) {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_file_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"clip_size": 0}"#);
        assert!(matches!(
            ScoringConfig::load(&path),
            Err(ConfigError::Invalid { field: "clip_size", .. })
        ));
    }
}
