//! Command-line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::{ApiClient, RetryPolicy};
use commands::query::{NextCommands, QueryCommands};
use commands::raw::RawCommands;
use commands::report::ReportCommands;
use commands::schema::EntityCommands;

#[derive(Parser)]
#[command(name = "wastedge-cli")]
#[command(version, about = "Query the Wastedge ERP API", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ~/.config/wastedge-cli/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the number of attempts for each request
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the entities exposed by the service
    Schema,
    /// Show the members of an entity
    Entity(EntityCommands),
    /// Query an entity with filters
    Query(QueryCommands),
    /// Continue a query from a cursor
    Next(NextCommands),
    /// Send a raw request and print the response body
    Raw(RawCommands),
    /// Run a pivot report on an entity
    Report(ReportCommands),
}

/// How results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayFormat {
    #[default]
    Json,
    JsonCompact,
    Csv,
}

/// Amount of progress information printed around results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayStyle {
    #[default]
    Quiet,
    Verbose,
}

/// Shared state handed to every command
#[derive(Debug, Clone)]
pub struct Context {
    pub client: ApiClient,
    pub retry: RetryPolicy,
}

pub async fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Schema => commands::schema::handle_schema_command(ctx).await,
        Commands::Entity(args) => commands::schema::handle_entity_command(args, ctx).await,
        Commands::Query(args) => commands::query::handle_query_command(args, ctx).await,
        Commands::Next(args) => commands::query::handle_next_command(args, ctx).await,
        Commands::Raw(args) => commands::raw::handle_raw_command(args, ctx).await,
        Commands::Report(args) => commands::report::handle_report_command(args, ctx).await,
    }
}
