//! Per-frame obstacle detection

use chrono::{DateTime, Utc};
use depth_capture::{mm_to_feet, DepthFrame};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{DangerZoneClassifier, DangerZoneConfig, Region, RegionSegmenter};

/// Obstacle found in one region of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleObservation {
    /// Region the obstacle was found in
    pub region: Region,
    /// Mean in-band distance (feet, one decimal)
    pub distance_feet: f64,
    /// Mean in-band distance (millimeters, truncated)
    pub distance_mm: u32,
    /// Share of the region inside the danger zone (percent, one decimal)
    pub coverage_percent: f64,
    /// Capture time of the source frame
    pub observed_at: DateTime<Utc>,
}

/// Exact halves go to the even digit, so 12.25 becomes 12.2
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Obstacle detector over depth frames
#[derive(Debug, Clone)]
pub struct ObstacleDetector {
    segmenter: RegionSegmenter,
    classifier: DangerZoneClassifier,
}

impl ObstacleDetector {
    pub fn new(config: DangerZoneConfig) -> Self {
        Self {
            segmenter: RegionSegmenter::new(),
            classifier: DangerZoneClassifier::new(config),
        }
    }

    pub fn config(&self) -> &DangerZoneConfig {
        self.classifier.config()
    }

    /// Detect obstacles in a frame, at most one per region, in region order
    pub fn detect(&self, frame: &DepthFrame) -> Vec<ObstacleObservation> {
        self.segmenter
            .partition(frame.width())
            .into_iter()
            .filter_map(|span| {
                let reading = self.classifier.classify(frame.columns(span.columns))?;
                trace!(
                    "Region {} obstructed: coverage {:.3}, mean {:.1}mm",
                    span.region,
                    reading.coverage,
                    reading.mean_distance_mm
                );

                Some(ObstacleObservation {
                    region: span.region,
                    distance_feet: round_one_decimal(mm_to_feet(reading.mean_distance_mm)),
                    distance_mm: reading.mean_distance_mm as u32,
                    coverage_percent: round_one_decimal(reading.coverage * 100.0),
                    observed_at: frame.captured_at(),
                })
            })
            .collect()
    }
}

impl Default for ObstacleDetector {
    fn default() -> Self {
        Self::new(DangerZoneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array2};
    use proptest::prelude::*;

    fn frame(depth: Array2<u16>) -> DepthFrame {
        DepthFrame::new(depth, Utc::now(), 0)
    }

    #[test]
    fn test_far_frame_has_no_obstacles() {
        let detector = ObstacleDetector::new(DangerZoneConfig::from_feet(2.0, 4.0, 0.1).unwrap());
        let far = DepthFrame::filled(640, 400, 2000, Utc::now());
        assert!(detector.detect(&far).is_empty());
    }

    #[test]
    fn test_left_wall() {
        let detector = ObstacleDetector::new(DangerZoneConfig::from_feet(1.0, 4.0, 0.1).unwrap());
        let mut depth = Array2::from_elem((400, 640), 2000u16);
        depth.slice_mut(s![.., 0..213]).fill(600);
        let frame = frame(depth);

        let obstacles = detector.detect(&frame);
        assert_eq!(obstacles.len(), 1);

        let left = &obstacles[0];
        assert_eq!(left.region, Region::Left);
        assert_eq!(left.distance_mm, 600);
        assert_eq!(left.distance_feet, 2.0);
        assert_eq!(left.coverage_percent, 100.0);
        assert_eq!(left.observed_at, frame.captured_at());
    }

    #[test]
    fn test_results_in_region_order() {
        let detector = ObstacleDetector::default();
        let mut depth = Array2::from_elem((30, 30), 5000u16);
        depth.slice_mut(s![.., 20..30]).fill(1500);
        depth.slice_mut(s![.., 0..10]).fill(700);
        depth.slice_mut(s![0..15, 10..20]).fill(1000);

        let obstacles = detector.detect(&frame(depth));
        let regions: Vec<_> = obstacles.iter().map(|o| o.region).collect();
        assert_eq!(regions, vec![Region::Left, Region::Center, Region::Right]);

        assert_eq!(obstacles[0].distance_mm, 700);
        assert_eq!(obstacles[1].coverage_percent, 50.0);
        assert_eq!(obstacles[2].distance_feet, 4.9);
    }

    #[test]
    fn test_rounding_happens_once() {
        let detector = ObstacleDetector::default();
        // right column: one pixel at 700mm, two at 701mm
        let mut depth = Array2::from_elem((3, 3), 5000u16);
        depth.slice_mut(s![0..1, 2..3]).fill(700);
        depth.slice_mut(s![1..3, 2..3]).fill(701);

        let obstacles = detector.detect(&frame(depth));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].region, Region::Right);
        assert_eq!(obstacles[0].distance_mm, 700);
        assert_eq!(obstacles[0].distance_feet, 2.3);
    }

    #[test]
    fn test_coverage_half_rounds_to_even() {
        let detector = ObstacleDetector::default();
        // left column: 49 of 400 pixels in band, exactly 12.25%
        let mut depth = Array2::from_elem((400, 3), 5000u16);
        depth.slice_mut(s![0..49, 0..1]).fill(1000);

        let obstacles = detector.detect(&frame(depth));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].region, Region::Left);
        assert_eq!(obstacles[0].coverage_percent, 12.2);
    }

    #[test]
    fn test_observation_serializes_lowercase_region() {
        let obs = ObstacleObservation {
            region: Region::Center,
            distance_feet: 2.1,
            distance_mm: 640,
            coverage_percent: 12.5,
            observed_at: Utc::now(),
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["region"], "center");
    }

    proptest! {
        #[test]
        fn out_of_band_frames_are_clear(
            width in 1usize..48,
            height in 1usize..24,
            values in proptest::collection::vec(
                prop_oneof![0u16..609, 1220u16..=u16::MAX],
                48 * 24,
            ),
        ) {
            let detector = ObstacleDetector::new(DangerZoneConfig::from_feet(2.0, 4.0, 0.1).unwrap());
            let depth = Array2::from_shape_vec((height, width), values[..width * height].to_vec()).unwrap();
            prop_assert!(detector.detect(&frame(depth)).is_empty());
        }
    }
}
