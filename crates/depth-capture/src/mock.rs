//! Synthetic depth camera for running without hardware

use chrono::Utc;
use ndarray::{s, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::{CameraConfig, CaptureError, DepthCamera, DepthFrame};

/// Random background range in millimeters (0.5 m to 4 m)
const BACKGROUND_MM: std::ops::Range<u16> = 500..4000;

/// Planted obstacles as (rows, columns, distance_mm)
const OBSTACLES: [((usize, usize), (usize, usize), u16); 2] = [
    // close obstacle, about 2 feet
    ((100, 200), (200, 300), 600),
    // medium distance, about 3 feet
    ((150, 250), (350, 450), 900),
];

/// Mock depth camera.
///
/// Every frame has a uniformly random background with two fixed blocks of
/// constant depth planted on top, clipped to the frame size.
pub struct MockDepthCamera {
    width: u32,
    height: u32,
    rng: StdRng,
    sequence: u64,
    opened: bool,
}

impl MockDepthCamera {
    /// Create a mock camera from configuration
    pub fn new(config: &CameraConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            width: config.width,
            height: config.height,
            rng,
            sequence: 0,
            opened: false,
        }
    }

    fn synthesize(&mut self) -> Array2<u16> {
        let (rows, cols) = (self.height as usize, self.width as usize);
        let rng = &mut self.rng;
        let mut depth = Array2::from_shape_simple_fn((rows, cols), || rng.gen_range(BACKGROUND_MM));

        for ((r0, r1), (c0, c1), distance_mm) in OBSTACLES {
            let (r0, r1) = (r0.min(rows), r1.min(rows));
            let (c0, c1) = (c0.min(cols), c1.min(cols));
            depth.slice_mut(s![r0..r1, c0..c1]).fill(distance_mm);
        }

        depth
    }
}

impl DepthCamera for MockDepthCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        info!("Mock depth camera started ({}x{})", self.width, self.height);
        self.opened = true;
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<DepthFrame, CaptureError> {
        if !self.opened {
            return Err(CaptureError::NotOpened);
        }

        let depth = self.synthesize();
        self.sequence += 1;
        debug!("Mock frame {} synthesized", self.sequence);

        Ok(DepthFrame::new(depth, Utc::now(), self.sequence))
    }

    fn close(&mut self) {
        if self.opened {
            info!("Mock depth camera stopped after {} frames", self.sequence);
        }
        self.opened = false;
    }

    fn name(&self) -> &str {
        "mock"
    }
}
