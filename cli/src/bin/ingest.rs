use clap::Parser;
use infrastructure::config::Config;
use presentation::cli::{run_ingest, IngestCli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    shared::telemetry::init_logging();
    let cli = IngestCli::parse();
    let config = Config::load()?;
    Ok(if run_ingest(cli, config).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
