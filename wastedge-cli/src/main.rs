use anyhow::{Context as _, Result};
use clap::Parser;
use log::LevelFilter;

use wastedge_cli::api::{ApiClient, RetryPolicy};
use wastedge_cli::cli::{self, Cli, Context};
use wastedge_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(retries) = cli.retries {
        config.retry.max_attempts = retries.max(1);
    }

    let credentials = config.credentials()?;
    log::debug!("Connecting to {} as {}", credentials.url(), credentials.user_name());

    let ctx = Context {
        client: ApiClient::new(credentials),
        retry: RetryPolicy::new(config.retry),
    };

    log::debug!("Up to {} attempts per request", ctx.retry.config().max_attempts);

    cli::run(cli.command, &ctx).await
}
