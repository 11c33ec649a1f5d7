//! Document store access
//!
//! Categories and products live in a hierarchical document database. The
//! [`DocumentStore`] trait is the seam between the feature services and the
//! backend: Firestore over its REST API in production, an in-process map for
//! tests and local development.

mod document;
mod firestore_client;
mod memory_store;
mod path;
mod value;

use async_trait::async_trait;
use rand::{distr::Alphanumeric, Rng};

pub use document::{DocumentFields, FieldValue, StoredDocument};
pub use firestore_client::FirestoreClient;
pub use memory_store::MemoryDocumentStore;
pub use path::{CollectionPath, DocumentPath};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Failed to obtain access token: {0}")]
    Auth(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

const AUTO_ID_LENGTH: usize = 20;

/// Generate a document id the way Firestore client libraries do: 20 random alphanumerics
pub(crate) fn auto_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name, used in startup logs
    fn backend_tag(&self) -> &'static str;

    /// Create a document with a store-generated id under `collection`, returning the id
    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: DocumentFields,
    ) -> StoreResult<String>;

    /// List every document directly under `collection`, in store order
    async fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<StoredDocument>>;

    /// Overwrite the given fields of an existing document, leaving other fields untouched
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn update_document(&self, document: &DocumentPath, fields: DocumentFields)
        -> StoreResult<()>;

    /// Delete a document; deleting a missing document succeeds
    async fn delete_document(&self, document: &DocumentPath) -> StoreResult<()>;
}
