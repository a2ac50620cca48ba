//! Depth Capture Library for the Navigation Hat
//!
//! Provides depth frames in millimeters from a stereo depth camera.
//! Supports:
//! - Synthetic mock camera (640x400) for bench testing without hardware
//! - OAK stereo depth camera through FFI bindings (feature `oak`)

#[cfg(feature = "oak")]
pub mod ffi;
pub mod frame;
pub mod mock;

pub use frame::{feet_to_mm, mm_to_feet, DepthFrame, MM_PER_FOOT};
pub use mock::MockDepthCamera;

#[cfg(feature = "oak")]
pub use ffi::OakDepthCamera;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Invalid frame format: {0}")]
    Format(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Capture timeout after {0}ms")]
    Timeout(u64),

    #[error("Camera not opened")]
    NotOpened,

    #[error("Camera disconnected")]
    Disconnected,
}

/// A source of depth frames.
///
/// `open` and `close` are called once each around the lifetime of a
/// navigation session; `capture_frame` blocks until a frame is available.
pub trait DepthCamera: Send {
    /// Acquire the device and start streaming
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Capture one depth frame
    fn capture_frame(&mut self) -> Result<DepthFrame, CaptureError>;

    /// Stop streaming and release the device
    fn close(&mut self);

    /// Short human-readable backend name for logs
    fn name(&self) -> &str;
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// OAK device MX id or IP; first available device when absent
    pub device: Option<String>,
    /// Depth frame width in pixels
    pub width: u32,
    /// Depth frame height in pixels
    pub height: u32,
    /// Target FPS
    pub fps: u32,
    /// How long a single frame read may block (hardware only)
    pub read_timeout_ms: u64,
    /// RNG seed for the mock camera; random when absent
    pub seed: Option<u64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: None,
            width: 640,
            height: 400,
            fps: 30,
            read_timeout_ms: 1000,
            seed: None,
        }
    }
}
