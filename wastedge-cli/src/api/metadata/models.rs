//! Wastedge metadata models

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared data type of an entity member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityDataType {
    String,
    Date,
    DateTime,
    /// Date-time carrying a UTC offset
    DateTimeTz,
    Integer,
    Long,
    Decimal,
    Float,
    Boolean,
    Other(String),
}

impl EntityDataType {
    /// Map a metadata type token to a data type
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "string" | "character" | "text" => Self::String,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "datetime-tz" | "datetimetz" => Self::DateTimeTz,
            "integer" | "int" => Self::Integer,
            "long" | "int64" => Self::Long,
            "decimal" => Self::Decimal,
            "float" | "double" => Self::Float,
            "boolean" | "logical" => Self::Boolean,
            _ => Self::Other(token.to_string()),
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::DateTimeTz)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Decimal | Self::Float)
    }
}

impl fmt::Display for EntityDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::DateTimeTz => write!(f, "datetime-tz"),
            Self::Integer => write!(f, "integer"),
            Self::Long => write!(f, "long"),
            Self::Decimal => write!(f, "decimal"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Other(token) => write!(f, "{}", token),
        }
    }
}

/// Kind of an entity member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Id,
    Field,
    Calculated,
    /// Reference to another entity, resolved lazily through the schema cache
    Foreign { link_table: String },
}

/// A named attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMember {
    pub name: String,
    pub data_type: EntityDataType,
    pub kind: MemberKind,
}

impl EntityMember {
    pub fn new(name: impl Into<String>, data_type: EntityDataType, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            data_type,
            kind,
        }
    }

    /// Shorthand for a plain field
    pub fn field(name: impl Into<String>, data_type: EntityDataType) -> Self {
        Self::new(name, data_type, MemberKind::Field)
    }

    /// Related entity name for foreign members
    pub fn link_table(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Foreign { link_table } => Some(link_table),
            MemberKind::Id | MemberKind::Field | MemberKind::Calculated => None,
        }
    }
}

/// Metadata for one entity, in server order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub members: Vec<EntityMember>,
    /// The `$meta` payload as received
    #[serde(default)]
    pub raw: Map<String, Value>,
}

impl EntitySchema {
    pub fn member(&self, name: &str) -> Option<&EntityMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn foreign_members(&self) -> impl Iterator<Item = &EntityMember> {
        self.members.iter().filter(|m| m.link_table().is_some())
    }
}

/// Service-wide metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub entities: Vec<String>,
    #[serde(default)]
    pub raw: Map<String, Value>,
}

impl Schema {
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e == name)
    }
}
