//! Background speech worker
//!
//! Moves synthesis off the frame loop: messages go through a bounded queue
//! to a dedicated thread that owns the real sink. When the queue is full the
//! message is dropped and reported rather than blocking capture.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{SpeechError, SpeechSink};

enum Job {
    Speak(String),
    /// Answered once every job queued before it has been handled
    Flush(oneshot::Sender<()>),
}

/// Speech sink that hands messages to a worker thread
pub struct QueuedSpeech {
    sender: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    failures: Arc<AtomicU64>,
}

impl QueuedSpeech {
    /// Spawn a worker that speaks through `sink`, holding up to `capacity`
    /// pending messages
    pub fn spawn<S: SpeechSink + 'static>(mut sink: S, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity.max(1));
        let failures = Arc::new(AtomicU64::new(0));
        let failures_clone = failures.clone();

        let worker = std::thread::spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                match job {
                    Job::Speak(message) => {
                        if let Err(e) = sink.speak(&message) {
                            failures_clone.fetch_add(1, Ordering::Relaxed);
                            warn!("Queued announcement failed: {}", e);
                        }
                    }
                    Job::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("Speech worker drained");
        });

        Self {
            sender: Some(tx),
            worker: Some(worker),
            failures,
        }
    }
}

impl SpeechSink for QueuedSpeech {
    fn speak(&mut self, message: &str) -> Result<(), SpeechError> {
        let sender = self.sender.as_ref().ok_or(SpeechError::WorkerStopped)?;
        sender
            .try_send(Job::Speak(message.to_string()))
            .map_err(|e| match e {
                TrySendError::Full(_) => SpeechError::QueueFull(message.to_string()),
                TrySendError::Closed(_) => SpeechError::WorkerStopped,
            })
    }

    /// Blocks until the worker has worked through everything queued so far
    fn flush(&mut self) -> Result<(), SpeechError> {
        let sender = self.sender.as_ref().ok_or(SpeechError::WorkerStopped)?;
        let (done_tx, done_rx) = oneshot::channel();
        sender
            .blocking_send(Job::Flush(done_tx))
            .map_err(|_| SpeechError::WorkerStopped)?;
        done_rx.blocking_recv().map_err(|_| SpeechError::WorkerStopped)
    }

    /// Messages the worker failed to speak
    fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Drop for QueuedSpeech {
    fn drop(&mut self) {
        // closing the channel lets the worker finish what is queued and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Speech worker panicked");
            }
        }
    }
}
