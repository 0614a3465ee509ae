mod cli;
mod commands;
mod config;
mod error;
mod render;

use std::process::ExitCode;

use clap::Parser;
use storefront::config::StorefrontConfig;
use storefront::net::{ApiClient, Storefront};
use storefront::session::Session;
use storefront::storage::FileStorage;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let config = match cli.base_url.as_deref() {
        Some(url) => StorefrontConfig::with_base_url(url),
        None => StorefrontConfig::from_env(),
    };
    let state_file = cli.state_file.unwrap_or_else(config::default_state_file);
    tracing::debug!(base_url = %config.api_base_url, state_file = %state_file.display(), "starting");

    let session = Session::new(FileStorage::open(state_file)?);
    let store = Storefront::new(ApiClient::new(&config, session)?);
    commands::run(&store, cli.command).await
}
