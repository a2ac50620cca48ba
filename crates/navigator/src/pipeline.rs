//! Frame processing loop
//!
//! One thread polls the camera and drives each frame through detection,
//! priority selection, message composition and the announcement throttle
//! before handing approved warnings to the speech sink.

use alerting::{Alert, AlertComposer, AnnouncementThrottle};
use depth_capture::{CaptureError, DepthCamera};
use metrics::counter;
use obstacle_detection::{ObstacleDetector, ObstacleObservation, PrioritySelector};
use serde::Serialize;
use speech_output::{build_sink, SpeechSink};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::settings::{ConfigError, NavigatorConfig};

/// Counters reported when the loop exits
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames captured and analysed
    pub frames_processed: u64,
    /// Frames with at least one obstacle
    pub frames_with_detections: u64,
    /// Cycles skipped because no frame was available
    pub capture_failures: u64,
    /// Warnings approved by the throttle
    pub announcements: u64,
    /// Approved warnings the speech sink failed to play
    pub speech_failures: u64,
    /// Wall time spent in the loop
    pub elapsed_seconds: f64,
}

impl RunSummary {
    /// Share of frames with detections in percent; `None` before any frame
    pub fn detection_rate(&self) -> Option<f64> {
        (self.frames_processed > 0)
            .then(|| self.frames_with_detections as f64 / self.frames_processed as f64 * 100.0)
    }

    /// Write the summary, including the detection rate, as pretty JSON
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let mut value = serde_json::to_value(self)?;
        if let Some(rate) = self.detection_rate() {
            value["detection_rate_percent"] = serde_json::json!(rate);
        }
        std::fs::write(path, serde_json::to_vec_pretty(&value)?)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System Statistics:")?;
        writeln!(f, "  Total frames processed: {}", self.frames_processed)?;
        writeln!(f, "  Frames with detections: {}", self.frames_with_detections)?;
        if let Some(rate) = self.detection_rate() {
            writeln!(f, "  Detection rate: {:.1}%", rate)?;
        }
        writeln!(f, "  Capture failures: {}", self.capture_failures)?;
        writeln!(f, "  Announcements: {}", self.announcements)?;
        write!(f, "  Speech failures: {}", self.speech_failures)
    }
}

/// Everything that happened to one frame
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub observations: Vec<ObstacleObservation>,
    pub priority: Option<ObstacleObservation>,
    pub alert: Option<Alert>,
    /// Whether the throttle approved the alert
    pub announced: bool,
}

/// The navigation loop
pub struct FrameProcessingLoop {
    camera: Box<dyn DepthCamera>,
    speech: Box<dyn SpeechSink>,
    detector: ObstacleDetector,
    selector: PrioritySelector,
    composer: AlertComposer,
    throttle: AnnouncementThrottle,
    frame_interval: Duration,
    status_every: u64,
    started: Option<Instant>,
    summary: RunSummary,
    /// Sink-reported failures already folded into the summary
    sink_failures_seen: u64,
}

impl FrameProcessingLoop {
    pub fn new(
        camera: Box<dyn DepthCamera>,
        speech: Box<dyn SpeechSink>,
        detector: ObstacleDetector,
        throttle: AnnouncementThrottle,
    ) -> Self {
        Self {
            camera,
            speech,
            detector,
            selector: PrioritySelector::new(),
            composer: AlertComposer::new(),
            throttle,
            frame_interval: Duration::from_millis(100),
            status_every: 10,
            started: None,
            summary: RunSummary::default(),
            sink_failures_seen: 0,
        }
    }

    /// Build the loop and its collaborators from validated configuration
    pub fn from_config(config: &NavigatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let camera = config.build_camera()?;
        let speech = build_sink(&config.speech);

        Ok(Self::new(camera, speech, config.detector()?, config.throttle()?)
            .with_frame_interval(config.frame_interval())
            .with_status_every(config.status_every_frames))
    }

    /// Pause between cycles
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Log a status line every `frames` frames; 0 disables it
    pub fn with_status_every(mut self, frames: u64) -> Self {
        self.status_every = frames;
        self
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Capture and process a single frame.
    ///
    /// A capture failure is counted and returned; the caller decides whether
    /// to carry on. Speech failures are logged and never returned.
    pub fn process_frame(&mut self) -> Result<CycleReport, CaptureError> {
        let frame = match self.camera.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.summary.capture_failures += 1;
                counter!("nav_capture_failures_total").increment(1);
                return Err(e);
            }
        };

        let mut report = CycleReport {
            observations: self.detector.detect(&frame),
            ..Default::default()
        };

        if let Some(priority) = self.selector.select(&report.observations) {
            self.summary.frames_with_detections += 1;
            counter!("nav_detection_frames_total").increment(1);

            let alert = self.composer.compose(&priority);
            if self.throttle.should_emit_now(&alert.message, false) {
                report.announced = true;
                self.summary.announcements += 1;
                counter!("nav_announcements_total").increment(1);

                if let Err(e) = self.speech.speak(&alert.message) {
                    self.summary.speech_failures += 1;
                    counter!("nav_speech_failures_total").increment(1);
                    warn!("Announcement not spoken ({}): {}", alert.message, e);
                }
            }

            report.priority = Some(priority);
            report.alert = Some(alert);
        }

        self.summary.frames_processed += 1;
        counter!("nav_frames_total").increment(1);
        self.collect_sink_failures();

        if self.status_every > 0 && self.summary.frames_processed % self.status_every == 0 {
            self.log_status(&report);
        }

        Ok(report)
    }

    /// Count failures the speech sink reported after `speak` returned
    fn collect_sink_failures(&mut self) {
        let total = self.speech.failures();
        let new = total.saturating_sub(self.sink_failures_seen);
        if new > 0 {
            self.summary.speech_failures += new;
            counter!("nav_speech_failures_total").increment(new);
            self.sink_failures_seen = total;
        }
    }

    fn log_status(&self, report: &CycleReport) {
        let elapsed = self.started.map_or(0.0, |t| t.elapsed().as_secs_f64());
        info!(
            "[{:.1}s] Frame {}: {} obstacle(s)",
            elapsed,
            self.summary.frames_processed,
            report.observations.len()
        );
        for (i, obs) in report.observations.iter().enumerate() {
            info!(
                "  Obstacle {}: region={}, distance={:.1} ft, coverage={:.1}%",
                i + 1,
                obs.region,
                obs.distance_feet,
                obs.coverage_percent
            );
        }
    }

    /// Run until `duration` elapses or `running` is cleared.
    ///
    /// The camera is opened first and always closed on the way out. Only a
    /// failure to open the camera is returned as an error.
    pub fn run(
        &mut self,
        duration: Option<Duration>,
        running: &AtomicBool,
    ) -> Result<RunSummary, CaptureError> {
        self.camera.open()?;
        self.summary = RunSummary::default();
        self.sink_failures_seen = self.speech.failures();

        match duration {
            Some(d) => info!("Starting navigation assistance for {:.1} seconds", d.as_secs_f64()),
            None => info!("Starting navigation assistance until interrupted"),
        }

        let start = Instant::now();
        self.started = Some(start);

        while running.load(Ordering::SeqCst) && duration.map_or(true, |d| start.elapsed() < d) {
            match self.process_frame() {
                Ok(report) if report.announced => {
                    debug!("Announced: {:?}", report.alert.map(|a| a.message));
                }
                Ok(_) => {}
                Err(e) => warn!("Frame skipped: {}", e),
            }

            if !self.frame_interval.is_zero() {
                std::thread::sleep(self.frame_interval);
            }
        }

        if !running.load(Ordering::SeqCst) {
            info!("System stopped by user");
        }

        self.camera.close();
        if let Err(e) = self.speech.flush() {
            warn!("Pending announcements not played: {}", e);
        }
        self.collect_sink_failures();
        self.summary.elapsed_seconds = start.elapsed().as_secs_f64();

        info!("{}", self.summary);
        info!("System stopped safely");
        Ok(self.summary.clone())
    }
}
