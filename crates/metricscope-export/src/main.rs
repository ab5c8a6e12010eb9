//! metricscope-dump
//!
//! Loads a YAML config, seeds an in-memory registry from its `metrics`
//! section, and prints the JSON export selected by its `request` section.
//!
//! Usage: `metricscope-dump [config.yaml]` (default `metricscope.yaml`).

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use metricscope_export::{config, to_json_format, to_json_format_pretty};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "metricscope.yaml".into());
    match run(&path) {
        Ok(doc) => {
            println!("{doc}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(config = %path, code = e.code().as_str(), "{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> metricscope_core::Result<String> {
    let cfg = config::load_from_file(path)?;
    let storage = cfg.build_storage()?;
    let request = cfg.request.to_request();

    tracing::info!(
        config = %path,
        prefix = request.prefix(),
        seeded = cfg.metrics.len(),
        "exporting metrics"
    );
    if cfg.output.pretty {
        to_json_format_pretty(&storage, &request)
    } else {
        to_json_format(&storage, &request)
    }
}
