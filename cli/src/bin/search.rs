use clap::Parser;
use infrastructure::config::Config;
use presentation::cli::{run_search, SearchCli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    shared::telemetry::init_logging();
    let cli = SearchCli::parse();
    let config = Config::load()?;
    Ok(if run_search(cli, config).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
