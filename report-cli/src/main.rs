//! # Report Builder
//!
//! Command-line entry point for the report builder.

use std::io::Write;

use clap::Parser;
use report_cli::{commands, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with optional JSON output.
///
/// Logs go to stderr so command output stays pipeable.
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("report_cli=info,report_core=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
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
    let config = CliConfig::from(&args);

    tracing::debug!(
        "Data dir {}, history limit {}",
        config.data_dir.display(),
        config.builder.history_limit
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&config, &args.command, &mut out)?;
    out.flush()?;
    Ok(())
}
