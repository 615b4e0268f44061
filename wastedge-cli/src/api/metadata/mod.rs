//! Entity metadata discovery and caching

pub mod cache;
pub mod models;
pub mod parser;

pub use cache::SchemaCache;
pub use models::{EntityDataType, EntityMember, EntitySchema, MemberKind, Schema};
pub use parser::{parse_entity_schema, parse_schema};
