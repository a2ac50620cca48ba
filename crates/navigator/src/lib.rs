//! Navigation Hat
//!
//! Wires the depth camera, obstacle detection, alerting and speech crates
//! into the frame processing loop behind the `nav-hat` binary.

pub mod diagnostics;
pub mod pipeline;
pub mod settings;

pub use pipeline::{CycleReport, FrameProcessingLoop, RunSummary};
pub use settings::{ConfigError, LogFormat, NavigatorConfig};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging(
    format: LogFormat,
    level: Level,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
}
