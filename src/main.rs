use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docs2csv::config::ToolPaths;
use docs2csv::{Cli, Extractor, Pipeline, RecordSink};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "DOCS2CSV_LOG";

/// Send diagnostics to stderr so they never mix with CSV on stdout.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = cli.load_settings()?;
    let config = cli.to_config(&settings, ToolPaths::detect());
    tracing::debug!("Configuration: {:?}", config);

    let extractor = Extractor::from_config(&config);
    if config.process {
        for backend in extractor.unavailable_backends(config.ocr_mode()) {
            tracing::warn!("{} not found; files that need it will be skipped", backend);
        }
    }

    let pipeline = Pipeline::new(config, extractor);
    let mut sink = RecordSink::open(&pipeline.config().output)?;
    pipeline
        .run(&cli.directory, &mut sink)
        .with_context(|| format!("Failed to convert {}", cli.directory.display()))?;
    sink.finish()?;

    Ok(())
}
