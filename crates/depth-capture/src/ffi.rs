//! FFI bindings for the OAK stereo depth camera
//!
//! The DepthAI pipeline (two mono cameras feeding a stereo depth node,
//! aligned to the RGB socket) lives in a small C shim, `liboak_depth`,
//! built by the host image. These bindings only move finished depth frames
//! across the boundary.

use chrono::Utc;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use tracing::{debug, info, warn};

use crate::{CameraConfig, CaptureError, DepthCamera, DepthFrame};

/// C depth frame structure (matches oak_depth.h)
#[repr(C)]
pub struct CDepthFrame {
    pub data: *const u16,
    pub width: u32,
    pub height: u32,
    pub timestamp_ns: u64,
    pub sequence: u64,
}

/// C camera configuration
#[repr(C)]
pub struct COakConfig {
    pub device_id: *const c_char,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub queue_size: i32,
}

extern "C" {
    fn oak_depth_open(config: *const COakConfig) -> i32;
    fn oak_depth_close();
    fn oak_depth_read_frame(timeout_ms: i32) -> *mut CDepthFrame;
    fn oak_depth_release_frame(frame: *mut CDepthFrame);
    fn oak_depth_last_error() -> *const c_char;
}

fn last_error() -> String {
    let msg = unsafe { oak_depth_last_error() };
    if msg.is_null() {
        return "unknown error".to_string();
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// Borrowed frame with RAII release
struct CapturedFrame {
    ptr: *mut CDepthFrame,
}

impl CapturedFrame {
    fn to_depth_frame(&self) -> Result<DepthFrame, CaptureError> {
        let frame = unsafe { &*self.ptr };
        if frame.data.is_null() {
            return Err(CaptureError::Format("null depth buffer".to_string()));
        }

        let len = frame.width as usize * frame.height as usize;
        let data = unsafe { std::slice::from_raw_parts(frame.data, len) }.to_vec();

        DepthFrame::from_raw(frame.width, frame.height, data, Utc::now(), frame.sequence)
    }
}

impl Drop for CapturedFrame {
    fn drop(&mut self) {
        unsafe { oak_depth_release_frame(self.ptr) };
    }
}

/// OAK stereo depth camera
pub struct OakDepthCamera {
    device: Option<CString>,
    width: u32,
    height: u32,
    fps: u32,
    timeout_ms: u64,
    opened: bool,
}

impl OakDepthCamera {
    pub fn new(config: &CameraConfig) -> Result<Self, CaptureError> {
        let device = config
            .device
            .as_deref()
            .map(CString::new)
            .transpose()
            .map_err(|e| CaptureError::Open(e.to_string()))?;

        Ok(Self {
            device,
            width: config.width,
            height: config.height,
            fps: config.fps,
            timeout_ms: config.read_timeout_ms,
            opened: false,
        })
    }
}

impl DepthCamera for OakDepthCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        let c_config = COakConfig {
            device_id: self.device.as_ref().map_or(ptr::null(), |d| d.as_ptr()),
            width: self.width,
            height: self.height,
            fps: self.fps,
            queue_size: 4,
        };

        let ret = unsafe { oak_depth_open(&c_config) };
        if ret != 0 {
            return Err(CaptureError::Open(format!("Init failed ({}): {}", ret, last_error())));
        }

        self.opened = true;
        info!("OAK camera connected and streaming ({}x{} @ {}fps)", self.width, self.height, self.fps);
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<DepthFrame, CaptureError> {
        if !self.opened {
            return Err(CaptureError::NotOpened);
        }

        let timeout_ms = i32::try_from(self.timeout_ms).unwrap_or(i32::MAX);
        let ptr = unsafe { oak_depth_read_frame(timeout_ms) };
        if ptr.is_null() {
            let reason = last_error();
            debug!("OAK read returned no frame: {}", reason);
            return Err(CaptureError::Timeout(self.timeout_ms));
        }

        CapturedFrame { ptr }.to_depth_frame()
    }

    fn close(&mut self) {
        if self.opened {
            unsafe { oak_depth_close() };
            self.opened = false;
            info!("OAK camera closed");
        }
    }

    fn name(&self) -> &str {
        "oak"
    }
}

impl Drop for OakDepthCamera {
    fn drop(&mut self) {
        if self.opened {
            warn!("OAK camera dropped while streaming, closing");
            self.close();
        }
    }
}
