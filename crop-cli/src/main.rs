//! # Crop Circle Replay
//!
//! Replays a recorded crop-frame session and prints the notifications.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use crop_cli::{render, replay, CliArgs, ReplayScript};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: `info,crop_core=debug`).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crop_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::info!("Replaying {}", args.script.display());

    let script = ReplayScript::load(&args.script)
        .with_context(|| format!("Failed to load replay script {}", args.script.display()))?;
    let outcome = replay(&script).context("Replay failed")?;

    let output = render(&outcome.records, args.format).context("Failed to format records")?;
    std::io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("Failed to write output")?;

    if outcome.removed {
        tracing::info!("Widget removed during replay");
    }
    Ok(())
}
