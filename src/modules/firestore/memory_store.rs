use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{
    auto_id, CollectionPath, DocumentFields, DocumentPath, DocumentStore, FieldValue, StoreError,
    StoreResult, StoredDocument,
};

/// In-process document store
///
/// Documents are keyed by full path, so listing a collection yields its documents
/// ordered by id, matching Firestore's default ordering.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<String, (DocumentPath, Map<String, Value>)>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw fields of a document, if present
    #[cfg(test)]
    pub async fn get(&self, document: &DocumentPath) -> Option<Map<String, Value>> {
        self.documents
            .read()
            .await
            .get(&document.to_string())
            .map(|(_, fields)| fields.clone())
    }

    /// Total number of documents across all collections
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    fn apply(target: &mut Map<String, Value>, fields: DocumentFields) {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        for (name, value) in fields.iter() {
            let value = match value {
                FieldValue::String(s) => Value::String(s.clone()),
                FieldValue::ServerTimestamp => Value::String(now.clone()),
            };
            target.insert(name.to_string(), value);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: DocumentFields,
    ) -> StoreResult<String> {
        let mut documents = self.documents.write().await;

        let path = loop {
            let candidate = collection.doc(auto_id());
            if !documents.contains_key(&candidate.to_string()) {
                break candidate;
            }
        };

        let mut data = Map::new();
        Self::apply(&mut data, fields);

        let id = path.id().to_string();
        documents.insert(path.to_string(), (path, data));
        Ok(id)
    }

    async fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<StoredDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|(path, _)| path.parent() == *collection)
            .map(|(path, fields)| StoredDocument {
                id: path.id().to_string(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn update_document(
        &self,
        document: &DocumentPath,
        fields: DocumentFields,
    ) -> StoreResult<()> {
        let mut documents = self.documents.write().await;
        let (_, data) = documents
            .get_mut(&document.to_string())
            .ok_or_else(|| StoreError::NotFound(document.to_string()))?;
        Self::apply(data, fields);
        Ok(())
    }

    async fn delete_document(&self, document: &DocumentPath) -> StoreResult<()> {
        self.documents.write().await.remove(&document.to_string());
        Ok(())
    }
}
