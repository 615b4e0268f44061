//! Parsing of `$meta` payloads into metadata models

use serde_json::{Map, Value};

use super::models::{EntityDataType, EntityMember, EntitySchema, MemberKind, Schema};
use crate::api::error::{ApiError, Result};

/// Parse the root `$meta` payload.
///
/// Entities may be listed either as plain names or as objects with a `name`.
pub fn parse_schema(payload: Map<String, Value>) -> Result<Schema> {
    let entities = match payload.get("entities") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Some(_) => return Err(ApiError::protocol("schema 'entities' is not an array")),
        None => Vec::new(),
    };

    Ok(Schema {
        entities,
        raw: payload,
    })
}

/// Parse an entity `$meta` payload
pub fn parse_entity_schema(name: &str, payload: Map<String, Value>) -> Result<EntitySchema> {
    let members = match payload.get("members") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_object())
            .filter_map(parse_member)
            .collect(),
        Some(_) => {
            return Err(ApiError::protocol(format!(
                "entity '{}' metadata 'members' is not an array",
                name
            )));
        }
        None => Vec::new(),
    };

    Ok(EntitySchema {
        name: name.to_string(),
        members,
        raw: payload,
    })
}

fn parse_member(obj: &Map<String, Value>) -> Option<EntityMember> {
    let name = obj.get("name")?.as_str()?;
    let data_type = obj
        .get("dataType")
        .or_else(|| obj.get("data_type"))
        .and_then(Value::as_str)
        .map(EntityDataType::from_token)
        .unwrap_or(EntityDataType::String);

    let kind = match obj.get("type").and_then(Value::as_str)? {
        "id" => MemberKind::Id,
        "field" => MemberKind::Field,
        "calculated" => MemberKind::Calculated,
        "foreign" => {
            let link_table = obj
                .get("linkTable")
                .or_else(|| obj.get("link_table"))
                .and_then(Value::as_str)?;
            MemberKind::Foreign {
                link_table: link_table.to_string(),
            }
        }
        other => {
            log::debug!("Skipping member '{}' of unknown type '{}'", name, other);
            return None;
        }
    };

    Some(EntityMember::new(name, data_type, kind))
}
