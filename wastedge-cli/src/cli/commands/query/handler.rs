//! Query command handlers

use std::path::Path;
use std::time::Instant;

use anyhow::{Context as _, Result};
use colored::*;
use serde_json::{Map, Value as Json};

use super::{NextCommands, QueryCommands, parse_filters};
use crate::api::{OutputFormat, Pager, ResultSet, build_query_parameters};
use crate::cli::output::{emit, format_output};
use crate::cli::{Context, DisplayFormat, DisplayStyle};

pub async fn handle_query_command(args: QueryCommands, ctx: &Context) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }
    let verbose = args.style == DisplayStyle::Verbose;

    let client = &ctx.client;
    let entity_name = args.entity.as_str();
    let entity = ctx
        .retry
        .execute(|| client.get_entity_schema(entity_name))
        .await
        .with_context(|| format!("Failed to load metadata for entity '{}'", entity_name))?;

    let filters = parse_filters(&args.filters, &entity)?;
    let output_format = if args.compact {
        OutputFormat::Compact
    } else {
        OutputFormat::Verbose
    };

    if verbose {
        let params = build_query_parameters(&filters, args.offset, args.count, output_format)?;
        println!("Entity: {}", entity.name.bright_green().bold());
        println!("Parameters: {}", params.parameters.dimmed());
        println!();
    }

    let start = Instant::now();
    let first = ctx
        .retry
        .execute(|| client.query_with(&entity, &filters, args.offset, args.count, output_format))
        .await
        .context("Failed to execute query")?;

    let (data, pages) = if args.pages > 1 {
        follow_pages(first, args.pages, args.count, ctx).await?
    } else {
        (Json::Object(first.into_payload()), 1)
    };

    if verbose {
        println!(
            "Fetched {} page(s) in {:.2}ms",
            pages,
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    finish(&data, args.format, args.output.as_deref(), args.style)
}

pub async fn handle_next_command(args: NextCommands, ctx: &Context) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let client = &ctx.client;
    let entity_name = args.entity.as_str();
    let entity = ctx
        .retry
        .execute(|| client.get_entity_schema(entity_name))
        .await
        .with_context(|| format!("Failed to load metadata for entity '{}'", entity_name))?;

    let base = match args.base {
        Some(base) => base,
        None => {
            // Rebuild the base parameters of the original query
            let filters = parse_filters(&args.filters, &entity)?;
            let output_format = if args.compact {
                OutputFormat::Compact
            } else {
                OutputFormat::Verbose
            };
            build_query_parameters(&filters, None, None, output_format)?.base_parameters
        }
    };
    let pager = Pager::new(client.clone(), entity, base);

    if args.style == DisplayStyle::Verbose {
        println!("Parameters: {}", pager.next_parameters(&args.cursor, args.count)?.dimmed());
        println!();
    }

    let page = ctx
        .retry
        .execute(|| pager.next(&args.cursor, args.count))
        .await
        .context("Failed to fetch next page")?;

    let data = Json::Object(page.into_payload());
    finish(&data, args.format, args.output.as_deref(), args.style)
}

/// Walk continuation cursors, concatenating rows.
///
/// The combined payload carries the cursor of the last page fetched so the
/// caller can resume with `next`.
async fn follow_pages(
    first: ResultSet,
    max_pages: u32,
    count: Option<u32>,
    ctx: &Context,
) -> Result<(Json, u32)> {
    let mut rows: Vec<Json> = first.rows().to_vec();
    let mut cursor = first.next_cursor().map(str::to_string);
    let pager = first.pager().clone();
    let mut pages = 1;

    while pages < max_pages {
        let Some(start) = cursor.take() else {
            break;
        };
        log::debug!("Following cursor to page {}", pages + 1);

        let page = ctx
            .retry
            .execute(|| pager.next(&start, count))
            .await
            .with_context(|| format!("Failed to fetch page {}", pages + 1))?;

        pages += 1;
        if page.rows().is_empty() {
            break;
        }
        rows.extend_from_slice(page.rows());
        cursor = page.next_cursor().map(str::to_string);
    }

    let mut combined = Map::new();
    combined.insert("result".to_string(), Json::Array(rows));
    if let Some(cursor) = cursor {
        combined.insert("next".to_string(), Json::String(cursor));
    }
    Ok((Json::Object(combined), pages))
}

fn finish(data: &Json, format: DisplayFormat, output: Option<&Path>, style: DisplayStyle) -> Result<()> {
    let formatted = format_output(data, format)?;
    emit(&formatted, output, style)?;

    // Keep stdout clean for piping; the cursor goes to stderr
    if let Some(cursor) = data.get("next").and_then(Json::as_str).filter(|c| !c.is_empty()) {
        eprintln!("{} {}", "Next cursor:".dimmed(), cursor);
    }
    Ok(())
}
