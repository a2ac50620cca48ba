//! Navigation Hat - Main Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};
use navigator::diagnostics::{probe, speech_check};
use navigator::{init_logging, FrameProcessingLoop, LogFormat, NavigatorConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "nav-hat")]
#[command(about = "Spoken obstacle warnings from a head-mounted depth camera", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run navigation assistance (default)
    Run {
        /// Stop after this many seconds
        #[arg(long, short)]
        duration: Option<f64>,

        /// Use the synthetic camera
        #[arg(long, conflicts_with = "hardware")]
        mock: bool,

        /// Use the OAK depth camera
        #[arg(long)]
        hardware: bool,
    },

    /// Capture a few frames and log detections without speaking
    Probe {
        #[arg(long, default_value = "5")]
        frames: u32,

        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },

    /// Speak one sample warning per urgency tier
    SpeechTest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = NavigatorConfig::load(cli.config.as_deref())?;
    if cli.log_json {
        config.log_format = LogFormat::Json;
    }

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_logging(config.log_format, level).context("Failed to set tracing subscriber")?;

    info!("=== Navigation Hat v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Run {
        duration: None,
        mock: false,
        hardware: false,
    }) {
        Commands::Run {
            duration,
            mock,
            hardware,
        } => {
            if duration.is_some() {
                config.run_duration_seconds = duration;
            }
            if mock {
                config.use_mock_camera = true;
            } else if hardware {
                config.use_mock_camera = false;
            }
            run(&config)
        }
        Commands::Probe {
            frames,
            interval_ms,
        } => {
            config.validate()?;
            let mut camera = config.build_camera()?;
            let report = probe(
                camera.as_mut(),
                &config.detector()?,
                frames,
                Duration::from_millis(interval_ms),
            )?;
            info!(
                "Probe finished: {} captured, {} failed",
                report.frames_captured, report.capture_failures
            );
            if let Some(nearest) = report.nearest {
                info!(
                    "Nearest obstacle: {} at {:.1} ft",
                    nearest.region, nearest.distance_feet
                );
            }
            Ok(())
        }
        Commands::SpeechTest => {
            let mut sink = speech_output::build_sink(&config.speech);
            let spoken = speech_check(sink.as_mut())?;
            info!("Speech test complete ({} messages)", spoken.len());
            Ok(())
        }
    }
}

fn run(config: &NavigatorConfig) -> anyhow::Result<()> {
    let mut nav = FrameProcessingLoop::from_config(config)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl-C handler")?;

    let summary = nav.run(config.run_duration(), &running)?;

    if let Some(path) = &config.summary_path {
        summary
            .write_json(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}
