//! `report` command: pivot an entity by row and column dimensions

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value as Json;

use super::query::parse_filters;
use crate::api::{ReportField, ReportRequest, ReportTransform, ReportValue};
use crate::cli::output::{emit, format_output};
use crate::cli::{Context, DisplayFormat, DisplayStyle};

#[derive(Args)]
pub struct ReportCommands {
    /// Entity to report on
    pub entity: String,

    /// Row dimension, a member path such as `customer.region`, repeatable
    #[arg(short, long = "row", required = true)]
    pub rows: Vec<String>,

    /// Column dimension, repeatable
    #[arg(short, long = "column", required = true)]
    pub columns: Vec<String>,

    /// Aggregated value `path[:transform]`, transform defaults to sum
    #[arg(short = 'a', long = "value")]
    pub values: Vec<String>,

    /// Filter term `field:operator[:value]`, repeatable
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: DisplayFormat,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn handle_report_command(args: ReportCommands, ctx: &Context) -> Result<()> {
    let client = &ctx.client;
    let entity_name = args.entity.as_str();
    let entity = ctx
        .retry
        .execute(|| client.get_entity_schema(entity_name))
        .await
        .with_context(|| format!("Failed to load metadata for entity '{}'", entity_name))?;

    let request = ReportRequest {
        filters: parse_filters(&args.filters, &entity)?,
        rows: parse_fields(&args.rows)?,
        columns: parse_fields(&args.columns)?,
        values: args
            .values
            .iter()
            .map(|v| parse_value(v))
            .collect::<Result<_>>()?,
    };

    let report = ctx
        .retry
        .execute(|| client.report(&entity.name, &request))
        .await
        .context("Failed to run report")?;

    let formatted = format_output(&Json::Object(report), args.format)?;
    emit(&formatted, args.output.as_deref(), DisplayStyle::Quiet)
}

fn parse_fields(paths: &[String]) -> Result<Vec<ReportField>> {
    paths
        .iter()
        .map(|p| p.parse::<ReportField>().with_context(|| format!("Invalid report field '{}'", p)))
        .collect()
}

/// `path[:transform]`
fn parse_value(term: &str) -> Result<ReportValue> {
    let (path, transform) = match term.split_once(':') {
        Some((path, transform)) => (path, transform.parse::<ReportTransform>()?),
        None => (term, ReportTransform::default()),
    };
    Ok(ReportValue {
        field: path
            .parse()
            .with_context(|| format!("Invalid report value '{}'", term))?,
        transform,
    })
}
