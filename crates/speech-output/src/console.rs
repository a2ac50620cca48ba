//! Console speech for running without audio hardware

use tracing::info;

use crate::{SpeechError, SpeechSink};

/// Logs each message instead of speaking it
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    spoken: u64,
}

impl ConsoleSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages logged so far
    pub fn spoken(&self) -> u64 {
        self.spoken
    }
}

impl SpeechSink for ConsoleSpeech {
    fn speak(&mut self, message: &str) -> Result<(), SpeechError> {
        info!("[AUDIO] {}", message);
        self.spoken += 1;
        Ok(())
    }
}
