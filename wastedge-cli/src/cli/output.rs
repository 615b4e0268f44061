//! Result rendering shared by the commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;

use super::{DisplayFormat, DisplayStyle};

/// Render `data` in the requested format.
///
/// CSV expects rows: an array of objects, or an object whose `result` member
/// is one. Anything else falls back to a single `value` column.
pub fn format_output(data: &Value, format: DisplayFormat) -> Result<String> {
    match format {
        DisplayFormat::Json => serde_json::to_string_pretty(data).context("Failed to format JSON output"),
        DisplayFormat::JsonCompact => serde_json::to_string(data).context("Failed to format JSON output"),
        DisplayFormat::Csv => match data {
            Value::Array(rows) => rows_to_csv(rows),
            Value::Object(obj) => match obj.get("result") {
                Some(Value::Array(rows)) => rows_to_csv(rows),
                _ => object_to_csv(obj),
            },
            other => write_csv(vec![vec!["value".to_string()], vec![json_value_to_string(other)]]),
        },
    }
}

/// Print to stdout or save to `output`
pub fn emit(formatted: &str, output: Option<&Path>, style: DisplayStyle) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, formatted)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            if style == DisplayStyle::Verbose {
                println!("Results saved to: {}", path.display().to_string().bright_green());
            }
        }
        None => {
            if style == DisplayStyle::Verbose {
                println!("Results:");
                println!();
            }
            println!("{}", formatted.trim_end());
        }
    }
    Ok(())
}

fn rows_to_csv(rows: &[Value]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    // Union of keys, in first-seen order
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(obj) = row {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let mut records = vec![headers.clone()];
    for row in rows {
        if let Value::Object(obj) = row {
            records.push(
                headers
                    .iter()
                    .map(|h| obj.get(h).map(json_value_to_string).unwrap_or_default())
                    .collect(),
            );
        }
    }
    write_csv(records)
}

fn object_to_csv(obj: &serde_json::Map<String, Value>) -> Result<String> {
    let mut records = vec![vec!["key".to_string(), "value".to_string()]];
    records.extend(obj.iter().map(|(k, v)| vec![k.clone(), json_value_to_string(v)]));
    write_csv(records)
}

fn write_csv(records: Vec<Vec<String>>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.write_record(&record).context("Failed to write CSV record")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Flatten a JSON value into a cell
fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
