//! One page of query results

use std::sync::Arc;

use serde_json::{Map, Value};

use super::pager::Pager;
use crate::api::metadata::EntitySchema;

/// A decoded page, bound to the entity it came from and the pager that
/// continues it
#[derive(Debug, Clone)]
pub struct ResultSet {
    entity: Arc<EntitySchema>,
    payload: Map<String, Value>,
    pager: Pager,
}

impl ResultSet {
    pub(crate) fn new(entity: Arc<EntitySchema>, payload: Map<String, Value>, pager: Pager) -> Self {
        Self {
            entity,
            payload,
            pager,
        }
    }

    pub fn entity(&self) -> &Arc<EntitySchema> {
        &self.entity
    }

    /// The response object as received
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Rows of the `result` array, empty when absent
    pub fn rows(&self) -> &[Value] {
        self.payload
            .get("result")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Continuation cursor from the `next` member, if the service sent one
    pub fn next_cursor(&self) -> Option<&str> {
        self.payload
            .get("next")
            .and_then(Value::as_str)
            .filter(|cursor| !cursor.is_empty())
    }

    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }
}
