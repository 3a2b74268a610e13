//! # Crop Circle Replay
//!
//! Native driver for the crop engine. A replay script describes the page
//! (container and image geometry), the widget options and a sequence of
//! steps captured from a browser session: input events, viewport resizes,
//! animation frames, attribute mutations and teardown. The replay runs the
//! steps through [`crop_core::RecordingHost`] and reports every frame-change
//! notification the widget emitted.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crop-cli -- --script trace.json
//! cargo run -p crop-cli -- --script trace.json --format json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayScript` / `Step` - The JSON script format
//! - `replay` - Runs a script and collects `ReplayRecord`s

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod replay;
mod script;

pub use replay::{render, replay, ReplayOutcome, ReplayRecord};
pub use script::{ReplayScript, Step};

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use crop_core::CropError;
use thiserror::Error;

/// Command-line arguments for crop-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "crop-replay")]
#[command(about = "Replay a recorded crop-frame interaction trace")]
#[command(version)]
pub struct CliArgs {
    /// Path to the JSON replay script
    #[arg(long, env = "CROP_REPLAY_SCRIPT")]
    pub script: PathBuf,

    /// Output format for frame-change records
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How replay records are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per record.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Errors from loading or running a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Script file could not be read.
    #[error("Failed to read script {path}: {source}")]
    Io {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Script is not valid JSON or has the wrong shape.
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    /// The widget rejected the script's options.
    #[error("Widget error: {0}")]
    Crop(#[from] CropError),
}
