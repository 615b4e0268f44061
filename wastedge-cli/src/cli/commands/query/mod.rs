//! `query` and `next` commands
//!
//! Filters are given as `field:operator[:value]`, for example
//! `status:eq:open`, `due:is.null` or `city:in:Oslo,Bergen`. Operands are
//! typed by the member's declared data type before they are encoded.

pub mod handler;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context as _, Result, bail};
use bigdecimal::BigDecimal;
use clap::Args;

use crate::api::query::{parse_date, parse_date_time, parse_date_time_offset};
use crate::api::{EntityDataType, EntityMember, EntitySchema, Filter, FilterType, Value};
use crate::cli::{DisplayFormat, DisplayStyle};

pub use handler::{handle_next_command, handle_query_command};

#[derive(Args)]
pub struct QueryCommands {
    /// Entity to query
    pub entity: String,

    /// Filter term `field:operator[:value]`, repeatable
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    /// Rows to skip
    #[arg(long)]
    pub offset: Option<u32>,

    /// Rows per page
    #[arg(long)]
    pub count: Option<u32>,

    /// Ask the service for compact field naming
    #[arg(long)]
    pub compact: bool,

    /// Follow continuation cursors for up to this many pages
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    #[arg(long, value_enum, default_value_t)]
    pub format: DisplayFormat,

    #[arg(long, value_enum, default_value_t)]
    pub style: DisplayStyle,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args)]
pub struct NextCommands {
    /// Entity of the original query
    pub entity: String,

    /// Cursor returned by the previous page
    pub cursor: String,

    /// Base parameters of the original query, verbatim
    #[arg(long, conflicts_with_all = ["filters", "compact"])]
    pub base: Option<String>,

    /// Filters of the original query, when `--base` is not given
    #[arg(short = 'F', long = "filter")]
    pub filters: Vec<String>,

    /// The original query used compact output
    #[arg(long)]
    pub compact: bool,

    /// Rows per page
    #[arg(long)]
    pub count: Option<u32>,

    #[arg(long, value_enum, default_value_t)]
    pub format: DisplayFormat,

    #[arg(long, value_enum, default_value_t)]
    pub style: DisplayStyle,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,
}

/// Resolve every `field:operator[:value]` term against the entity
pub fn parse_filters(terms: &[String], entity: &EntitySchema) -> Result<Vec<Filter>> {
    terms.iter().map(|term| parse_filter(term, entity)).collect()
}

pub fn parse_filter(term: &str, entity: &EntitySchema) -> Result<Filter> {
    let mut parts = term.splitn(3, ':');
    let (Some(field), Some(op)) = (parts.next(), parts.next()) else {
        bail!("Invalid filter '{}', expected field:operator[:value]", term);
    };
    let operand = parts.next();

    let member = entity.member(field).with_context(|| {
        format!("Entity '{}' has no member named '{}'", entity.name, field)
    })?;
    let filter_type = FilterType::from_str(op)?;

    let value = match (filter_type.takes_value(), operand) {
        (false, None) => None,
        (false, Some(_)) => bail!("Operator '{}' does not take a value", filter_type),
        (true, None) => bail!("Operator '{}' requires a value", filter_type),
        (true, Some(text)) if filter_type.takes_list() => Some(Value::List(
            text.split(',')
                .map(|item| parse_operand(item, member))
                .collect::<Result<_>>()?,
        )),
        (true, Some(text)) => Some(parse_operand(text, member)?),
    };

    Ok(Filter::new(member.clone(), filter_type, value)?)
}

/// Type command-line text by the member's declared data type
pub fn parse_operand(text: &str, member: &EntityMember) -> Result<Value> {
    let invalid = || format!("Invalid {} value '{}' for '{}'", member.data_type, text, member.name);

    Ok(match &member.data_type {
        EntityDataType::String | EntityDataType::Other(_) => Value::String(text.to_string()),
        EntityDataType::Date => Value::Date(parse_date(text)?),
        EntityDataType::DateTime => Value::DateTime(parse_date_time(text)?),
        EntityDataType::DateTimeTz => Value::DateTimeOffset(parse_date_time_offset(text)?),
        EntityDataType::Integer => Value::Int32(text.parse().with_context(invalid)?),
        EntityDataType::Long => Value::Int64(text.parse().with_context(invalid)?),
        EntityDataType::Decimal => Value::Decimal(BigDecimal::from_str(text).with_context(invalid)?),
        EntityDataType::Float => Value::Float64(text.parse().with_context(invalid)?),
        EntityDataType::Boolean => {
            bail!("Boolean member '{}' is filtered with is.true or is.false", member.name)
        }
    })
}
