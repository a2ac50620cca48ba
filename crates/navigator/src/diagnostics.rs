//! Bench checks for the camera and the speech output

use alerting::AlertComposer;
use chrono::Utc;
use depth_capture::{CaptureError, DepthCamera};
use obstacle_detection::{ObstacleDetector, ObstacleObservation, PrioritySelector, Region};
use speech_output::{SpeechError, SpeechSink};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a camera probe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    pub frames_captured: u32,
    pub capture_failures: u32,
    /// Closest obstacle seen across all frames
    pub nearest: Option<ObstacleObservation>,
}

/// Capture `frames` frames and log what the detector sees in each.
///
/// Nothing is spoken. Only a failure to open the camera is an error.
pub fn probe(
    camera: &mut dyn DepthCamera,
    detector: &ObstacleDetector,
    frames: u32,
    interval: Duration,
) -> Result<ProbeReport, CaptureError> {
    camera.open()?;
    info!("Probing {} for {} frame(s)", camera.name(), frames);

    let selector = PrioritySelector::new();
    let mut report = ProbeReport::default();

    for i in 0..frames {
        if i > 0 && !interval.is_zero() {
            std::thread::sleep(interval);
        }

        let frame = match camera.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                report.capture_failures += 1;
                warn!("Frame {} failed: {}", i + 1, e);
                continue;
            }
        };
        report.frames_captured += 1;

        let observations = detector.detect(&frame);
        info!(
            "Frame {} ({}x{}, seq {}): {} obstacle(s)",
            i + 1,
            frame.width(),
            frame.height(),
            frame.sequence(),
            observations.len()
        );
        for obs in &observations {
            info!(
                "  {}: {:.1} ft ({} mm), coverage {:.1}%",
                obs.region, obs.distance_feet, obs.distance_mm, obs.coverage_percent
            );
        }

        if let Some(priority) = selector.select(&observations) {
            info!("  Priority: {} at {:.1} ft", priority.region, priority.distance_feet);
            let closer = report
                .nearest
                .as_ref()
                .map_or(true, |n| priority.distance_feet < n.distance_feet);
            if closer {
                report.nearest = Some(priority);
            }
        }
    }

    camera.close();
    Ok(report)
}

/// Sample obstacles covering each urgency tier
pub fn sample_observations() -> Vec<ObstacleObservation> {
    [(Region::Center, 2.1), (Region::Left, 3.0), (Region::Right, 3.8)]
        .into_iter()
        .map(|(region, feet)| ObstacleObservation {
            region,
            distance_feet: feet,
            distance_mm: depth_capture::feet_to_mm(feet).round() as u32,
            coverage_percent: 50.0,
            observed_at: Utc::now(),
        })
        .collect()
}

/// Speak one warning per urgency tier. No throttle is involved, so every
/// sample is spoken.
///
/// Returns the messages in the order they were spoken, once the sink has
/// played them all.
pub fn speech_check(sink: &mut dyn SpeechSink) -> Result<Vec<String>, SpeechError> {
    let composer = AlertComposer::new();

    let mut spoken = Vec::new();
    for obs in sample_observations() {
        let alert = composer.compose(&obs);
        info!("Testing: {}", alert.message);
        sink.speak(&alert.message)?;
        spoken.push(alert.message);
    }

    sink.flush()?;
    Ok(spoken)
}
