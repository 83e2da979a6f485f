use clap::Parser;
use infrastructure::config::Config;
use presentation::cli::{run_chat, ChatCli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    shared::telemetry::init_logging();
    let cli = ChatCli::parse();
    let config = Config::load()?;
    Ok(if run_chat(cli, config).await? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
