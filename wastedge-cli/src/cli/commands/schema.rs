//! Metadata commands: `schema` and `entity`

use anyhow::{Context as _, Result};
use clap::Args;
use colored::*;

use crate::api::{EntityMember, MemberKind};
use crate::cli::Context;

#[derive(Args)]
pub struct EntityCommands {
    /// Entity name
    pub name: String,

    /// Also load the entities referenced by foreign members
    #[arg(long)]
    pub links: bool,
}

pub async fn handle_schema_command(ctx: &Context) -> Result<()> {
    let client = &ctx.client;
    let schema = ctx
        .retry
        .execute(|| client.get_schema())
        .await
        .context("Failed to load service metadata")?;

    let mut entities = schema.entities.clone();
    entities.sort();

    println!("{} ({})", "Entities".bold(), entities.len());
    for entity in entities {
        println!("  {}", entity.cyan());
    }
    Ok(())
}

pub async fn handle_entity_command(args: EntityCommands, ctx: &Context) -> Result<()> {
    let client = &ctx.client;
    let name = args.name.as_str();
    let entity = ctx
        .retry
        .execute(|| client.get_entity_schema(name))
        .await
        .with_context(|| format!("Failed to load metadata for entity '{}'", name))?;

    println!("{} {}", "Entity".bold(), entity.name.bright_green().bold());
    for member in &entity.members {
        println!("  {}", describe_member(member));
    }

    if args.links {
        for member in entity.foreign_members() {
            let linked = ctx
                .retry
                .execute(|| client.get_linked_schema(member))
                .await
                .with_context(|| format!("Failed to resolve link of '{}'", member.name))?;
            println!();
            println!(
                "{} {} {}",
                member.name.cyan(),
                "->".dimmed(),
                linked.name.bright_green().bold()
            );
            for linked_member in &linked.members {
                println!("  {}", describe_member(linked_member));
            }
        }
    }
    Ok(())
}

/// `name  type  kind [-> link]`
fn describe_member(member: &EntityMember) -> String {
    let kind = match &member.kind {
        MemberKind::Id => "id".yellow().to_string(),
        MemberKind::Field => "field".normal().to_string(),
        MemberKind::Calculated => "calculated".dimmed().to_string(),
        MemberKind::Foreign { link_table } => format!("foreign -> {}", link_table.cyan()),
    };
    let data_type = format!("{:<12}", member.data_type.to_string());
    let data_type = if member.data_type.is_date() {
        data_type.magenta()
    } else if member.data_type.is_numeric() {
        data_type.blue()
    } else {
        data_type.normal()
    };
    format!("{:<32} {} {}", member.name, data_type, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntityDataType;

    #[test]
    fn test_describe_member() {
        colored::control::set_override(false);

        let member = EntityMember::new(
            "customer",
            EntityDataType::Integer,
            MemberKind::Foreign {
                link_table: "customer".to_string(),
            },
        );
        let line = describe_member(&member);
        assert!(line.starts_with("customer "));
        assert!(line.contains("integer"));
        assert!(line.ends_with("foreign -> customer"));
    }
}
