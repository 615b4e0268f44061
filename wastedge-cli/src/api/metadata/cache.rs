//! Per-client metadata cache
//!
//! Entries are created on first lookup and live as long as the owning client.
//! There is no expiry and no invalidation: a schema change on the server
//! requires a new client. Concurrent first lookups for the same key may both
//! hit the network; whichever stores last is the instance kept.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use arc_swap::ArcSwapOption;

use super::models::{EntitySchema, Schema};

#[derive(Debug, Default)]
pub struct SchemaCache {
    schema: ArcSwapOption<Schema>,
    entities: RwLock<HashMap<String, Arc<EntitySchema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.schema.load_full()
    }

    pub fn store_schema(&self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.schema.store(Some(schema.clone()));
        schema
    }

    pub fn entity(&self, name: &str) -> Option<Arc<EntitySchema>> {
        self.entities
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    pub fn store_entity(&self, entity: EntitySchema) -> Arc<EntitySchema> {
        let entity = Arc::new(entity);
        self.entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(entity.name.clone(), entity.clone());
        entity
    }

    /// Names of all cached entities, sorted
    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entities
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> EntitySchema {
        EntitySchema {
            name: name.to_string(),
            members: Vec::new(),
            raw: Default::default(),
        }
    }

    #[test]
    fn test_lookup_returns_same_instance() {
        let cache = SchemaCache::new();
        assert!(cache.entity("order").is_none());

        let stored = cache.store_entity(entity("order"));
        let first = cache.entity("order").unwrap();
        let second = cache.entity("order").unwrap();

        assert!(Arc::ptr_eq(&stored, &first));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = SchemaCache::new();
        let _first = cache.store_entity(entity("order"));
        let second = cache.store_entity(entity("order"));

        assert!(Arc::ptr_eq(&cache.entity("order").unwrap(), &second));
        assert_eq!(cache.entity_names(), vec!["order".to_string()]);
    }

    #[test]
    fn test_schema_slot() {
        let cache = SchemaCache::new();
        assert!(cache.schema().is_none());

        let stored = cache.store_schema(Schema {
            entities: vec!["order".to_string()],
            raw: Default::default(),
        });
        assert!(Arc::ptr_eq(&cache.schema().unwrap(), &stored));
    }
}
