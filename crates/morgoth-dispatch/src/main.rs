//! morgoth metric dispatcher.
//!
//! - Config: first argument, default `morgoth.yaml`
//! - Input: Graphite plaintext lines on stdin (`<metric> <value> <timestamp>`)
//! - Output: supervisor records on the configured sink
//! - Dispatcher counters are logged at EOF

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use morgoth_core::error::{MorgothError, Result};
use morgoth_dispatch::{app_state::AppState, config};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout may be the record sink.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.kind().as_str(), "morgoth-dispatch failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "morgoth.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let state = AppState::new(cfg)?;

    tracing::info!(config = %path, supervisors = state.cfg().metrics.len(), "morgoth-dispatch starting");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| MorgothError::Internal(format!("read stdin failed: {e}")))?
    {
        if let Some(metric) = line.split_whitespace().next() {
            state.manager().observe_str(metric);
        }
    }

    tracing::info!(
        known = state.manager().known_count(),
        "input closed\n{}",
        state.manager().render_metrics()
    );
    Ok(())
}
