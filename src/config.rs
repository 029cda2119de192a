use crate::classification_client::impl_http::DEFAULT_ENDPOINT;
use crate::frame_sampler::sampler::SamplerSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    /// `None` waits for the endpoint indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub frame_count: usize,
    pub sample_interval_ms: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub jpeg_quality: u8,
    pub logger_utc_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: Some(60),
            frame_count: 50,
            sample_interval_ms: 3000,
            frame_width: 640,
            frame_height: 480,
            jpeg_quality: 92,
            logger_utc_offset_minutes: 0,
        }
    }
}

impl Config {
    /// Reads a JSON config. Fields left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::Invalid("frame_count must be at least 1".to_string()));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size {}x{} is empty",
                self.frame_width, self.frame_height
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality {} is outside 1..=100",
                self.jpeg_quality
            )));
        }
        self.logger_timezone()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn sampler_settings(&self) -> SamplerSettings {
        SamplerSettings {
            frame_count: self.frame_count,
            interval: Duration::from_millis(self.sample_interval_ms),
            width: self.frame_width,
            height: self.frame_height,
            jpeg_quality: self.jpeg_quality,
        }
    }

    pub fn logger_timezone(&self) -> Result<chrono::FixedOffset, ConfigError> {
        chrono::FixedOffset::east_opt(self.logger_utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "logger_utc_offset_minutes {} is out of range",
                self.logger_utc_offset_minutes
            ))
        })
    }
}
