//! Navigator configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `NAVHAT_*` environment variables. Nested keys use a
//! double underscore, e.g. `NAVHAT_SPEECH__BACKEND=console`.

use alerting::{AlertError, AnnouncementThrottle, ThrottleConfig};
use depth_capture::{CameraConfig, CaptureError, DepthCamera, MockDepthCamera};
use obstacle_detection::{DangerZoneConfig, DetectionError, ObstacleDetector, REGION_COUNT};
use serde::{Deserialize, Serialize};
use speech_output::SpeechConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "NAVHAT";

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    DangerZone(#[from] DetectionError),

    #[error(transparent)]
    Cooldown(#[from] AlertError),

    #[error("Region count is fixed at 3, got {0}")]
    RegionCount(usize),

    #[error("Run duration must be a non-negative number of seconds, got {0}")]
    RunDuration(f64),

    #[error("Hardware camera requested but this build lacks the `oak` feature; set use_mock_camera = true")]
    HardwareUnavailable,

    #[error("Camera setup failed: {0}")]
    Camera(#[from] CaptureError),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Navigator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Near edge of the danger zone (feet)
    pub min_distance_feet: f64,
    /// Far edge of the danger zone (feet)
    pub max_distance_feet: f64,
    /// Share of a region (0-1) that must be in the danger zone
    pub coverage_threshold: f64,
    /// Minimum time between identical announcements (seconds)
    pub cooldown_seconds: f64,
    /// Number of frame regions; only 3 is supported
    pub region_count: usize,
    /// Use the synthetic camera instead of the OAK device
    pub use_mock_camera: bool,
    /// Stop after this many seconds; runs until interrupted when absent
    pub run_duration_seconds: Option<f64>,
    /// Pause between frames (milliseconds)
    pub frame_interval_ms: u64,
    /// Log a status line every N frames; 0 disables
    pub status_every_frames: u64,
    pub camera: CameraConfig,
    pub speech: SpeechConfig,
    pub log_format: LogFormat,
    /// Write the end-of-run summary here as JSON
    pub summary_path: Option<PathBuf>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            min_distance_feet: 2.0,
            max_distance_feet: 6.0,
            coverage_threshold: 0.1,
            cooldown_seconds: 2.0,
            region_count: REGION_COUNT,
            use_mock_camera: true,
            run_duration_seconds: None,
            frame_interval_ms: 100,
            status_every_frames: 10,
            camera: CameraConfig::default(),
            speech: SpeechConfig::default(),
            log_format: LogFormat::Text,
            summary_path: None,
        }
    }
}

impl NavigatorConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// The result is not validated yet, so callers can apply command line
    /// overrides first.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let layered = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    /// Check every setting the navigation loop depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_count != REGION_COUNT {
            return Err(ConfigError::RegionCount(self.region_count));
        }

        if let Some(seconds) = self.run_duration_seconds {
            if seconds.is_nan() || seconds < 0.0 {
                return Err(ConfigError::RunDuration(seconds));
            }
        }

        self.danger_zone()?;
        self.throttle()?;

        if !self.use_mock_camera && !cfg!(feature = "oak") {
            return Err(ConfigError::HardwareUnavailable);
        }

        Ok(())
    }

    pub fn danger_zone(&self) -> Result<DangerZoneConfig, DetectionError> {
        DangerZoneConfig::from_feet(
            self.min_distance_feet,
            self.max_distance_feet,
            self.coverage_threshold,
        )
    }

    pub fn detector(&self) -> Result<ObstacleDetector, DetectionError> {
        Ok(ObstacleDetector::new(self.danger_zone()?))
    }

    pub fn throttle(&self) -> Result<AnnouncementThrottle, AlertError> {
        AnnouncementThrottle::new(ThrottleConfig {
            cooldown_seconds: self.cooldown_seconds,
        })
    }

    /// Build the configured camera
    pub fn build_camera(&self) -> Result<Box<dyn DepthCamera>, ConfigError> {
        if self.use_mock_camera {
            Ok(Box::new(MockDepthCamera::new(&self.camera)))
        } else {
            hardware_camera(&self.camera)
        }
    }

    /// Run duration; `None` runs until interrupted
    pub fn run_duration(&self) -> Option<Duration> {
        self.run_duration_seconds
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(feature = "oak")]
fn hardware_camera(config: &CameraConfig) -> Result<Box<dyn DepthCamera>, ConfigError> {
    Ok(Box::new(depth_capture::OakDepthCamera::new(config)?))
}

#[cfg(not(feature = "oak"))]
fn hardware_camera(_config: &CameraConfig) -> Result<Box<dyn DepthCamera>, ConfigError> {
    Err(ConfigError::HardwareUnavailable)
}
