//! espeak-ng speech synthesis

use std::process::{Command, Stdio};
use tracing::debug;

use crate::{SpeechConfig, SpeechError, SpeechSink};

/// Speaks through an espeak-ng compatible command line synthesizer.
///
/// Each message runs the synthesizer to completion, so `speak` returns once
/// the audio has played.
#[derive(Debug, Clone)]
pub struct EspeakSpeech {
    command: String,
    rate_wpm: u32,
    amplitude: u32,
    voice: Option<String>,
}

impl EspeakSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        // espeak amplitude: 0-200, 100 is the normal level
        let amplitude = (config.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        Self {
            command: config.command.clone(),
            rate_wpm: config.rate_wpm,
            amplitude,
            voice: config.voice.clone(),
        }
    }

    fn args(&self, message: &str) -> Vec<String> {
        let mut args = vec![
            "-s".to_string(),
            self.rate_wpm.to_string(),
            "-a".to_string(),
            self.amplitude.to_string(),
        ];
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push(message.to_string());
        args
    }
}

impl SpeechSink for EspeakSpeech {
    fn speak(&mut self, message: &str) -> Result<(), SpeechError> {
        debug!("Speaking via {}: {}", self.command, message);

        let status = Command::new(&self.command)
            .args(self.args(message))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SpeechError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Synthesis(status.to_string()))
        }
    }
}
