//! Speech Output
//!
//! Speaks composed obstacle warnings:
//! - espeak-ng synthesis for the headset
//! - console mock for bench runs
//! - queued worker so slow synthesis never stalls frame capture

mod console;
mod espeak;
mod queued;

pub use console::ConsoleSpeech;
pub use espeak::EspeakSpeech;
pub use queued::QueuedSpeech;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speech error types
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Failed to start speech synthesizer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Speech synthesizer exited with {0}")]
    Synthesis(String),

    #[error("Speech queue full, dropped: {0}")]
    QueueFull(String),

    #[error("Speech worker stopped")]
    WorkerStopped,
}

/// Something that can say a message out loud
pub trait SpeechSink: Send {
    /// Speak a message; blocks until the sink has accepted it
    fn speak(&mut self, message: &str) -> Result<(), SpeechError>;

    /// Wait until every accepted message has been handled
    fn flush(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    /// Accepted messages that later failed to play.
    ///
    /// Only sinks that speak after `speak` has returned report anything here.
    fn failures(&self) -> u64 {
        0
    }
}

/// Which speech backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    Espeak,
    Console,
}

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub backend: SpeechBackend,
    /// Synthesizer executable
    pub command: String,
    /// Speaking rate (words per minute)
    pub rate_wpm: u32,
    /// Volume from 0.0 to 1.0
    pub volume: f32,
    /// Synthesizer voice name; default voice when absent
    pub voice: Option<String>,
    /// Pending messages held for a background worker; 0 speaks inline
    pub queue_capacity: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::Espeak,
            command: "espeak-ng".to_string(),
            rate_wpm: 175,
            volume: 1.0,
            voice: None,
            queue_capacity: 0,
        }
    }
}

/// Build the configured speech sink
pub fn build_sink(config: &SpeechConfig) -> Box<dyn SpeechSink> {
    let sink: Box<dyn SpeechSink> = match config.backend {
        SpeechBackend::Espeak => Box::new(EspeakSpeech::new(config)),
        SpeechBackend::Console => Box::new(ConsoleSpeech::new()),
    };

    if config.queue_capacity > 0 {
        Box::new(QueuedSpeech::spawn(sink, config.queue_capacity))
    } else {
        sink
    }
}

impl<S: SpeechSink + ?Sized> SpeechSink for Box<S> {
    fn speak(&mut self, message: &str) -> Result<(), SpeechError> {
        (**self).speak(message)
    }

    fn flush(&mut self) -> Result<(), SpeechError> {
        (**self).flush()
    }

    fn failures(&self) -> u64 {
        (**self).failures()
    }
}
