use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Value written to a document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    /// Resolved by the store to the commit time of the write
    ServerTimestamp,
}

/// Set of fields carried by a create or update
///
/// Field order is stable so that update masks and test assertions are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFields {
    fields: BTreeMap<String, FieldValue>,
}

impl DocumentFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::String(value.into()));
        self
    }

    pub fn server_timestamp(mut self, name: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::ServerTimestamp);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Document as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Field values decoded to plain JSON; timestamps are RFC 3339 strings
    pub fields: Map<String, Value>,
}
