//! Obstacle Detection
//!
//! Danger-zone analysis of depth frames:
//! - Fixed left/center/right region partitioning
//! - Per-region coverage of the configured distance band
//! - Obstacle observations in feet and millimeters
//! - Selection of the single closest obstacle

pub mod classifier;
pub mod config;
pub mod detector;
pub mod priority;
pub mod region;

pub use classifier::{DangerZoneClassifier, ZoneReading};
pub use config::DangerZoneConfig;
pub use detector::{ObstacleDetector, ObstacleObservation};
pub use priority::PrioritySelector;
pub use region::{Region, RegionSegmenter, RegionSpan, REGION_COUNT};

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Invalid danger zone: min {min_mm}mm must be >= 0 and below max {max_mm}mm")]
    InvalidBand { min_mm: f64, max_mm: f64 },

    #[error("Coverage threshold {0} is outside [0, 1]")]
    InvalidCoverageThreshold(f64),
}
