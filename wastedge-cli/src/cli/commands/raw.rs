//! `raw` command: send a request as-is and print the body

use std::str::FromStr;

use anyhow::{Context as _, Result};
use clap::Args;

use crate::api::{Method, parse_json};
use crate::cli::Context;

#[derive(Args)]
pub struct RawCommands {
    /// Resource path passed as `$uri` (empty for the service root)
    pub path: String,

    /// Extra query parameters, already encoded (`$meta`, `a=eq.1&$count=5`)
    #[arg(short, long)]
    pub params: Option<String>,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request body, sent as JSON
    #[arg(short, long)]
    pub body: Option<String>,

    /// Print the body without re-indenting it
    #[arg(long)]
    pub plain: bool,
}

pub async fn handle_raw_command(args: RawCommands, ctx: &Context) -> Result<()> {
    let method = Method::from_str(&args.method.to_ascii_uppercase())
        .with_context(|| format!("Invalid HTTP method '{}'", args.method))?;

    if let Some(body) = &args.body {
        serde_json::from_str::<serde_json::Value>(body).context("Request body is not valid JSON")?;
    }

    let client = &ctx.client;
    let text = ctx
        .retry
        .execute(|| {
            client.execute_raw(
                &args.path,
                args.params.as_deref(),
                method.clone(),
                args.body.as_deref(),
            )
        })
        .await
        .context("Request failed")?;

    println!("{}", render(&text, args.plain)?);
    Ok(())
}

fn render(text: &str, plain: bool) -> Result<String> {
    if plain {
        return Ok(text.to_string());
    }
    Ok(match parse_json(text)? {
        Some(value) => serde_json::to_string_pretty(&value)?,
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(render("", false).unwrap(), "");
        assert_eq!(render(r#"{"a":1.50}"#, false).unwrap(), "{\n  \"a\": 1.50\n}");
        assert_eq!(render("not json", true).unwrap(), "not json");
        assert!(render("not json", false).is_err());
    }
}
