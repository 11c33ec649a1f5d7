use std::sync::Arc;

use crate::core::config::{Config, StoreBackend};
use crate::modules::firestore::{DocumentStore, FirestoreClient, MemoryDocumentStore};
use crate::modules::gcp::{GoogleTokenManager, ServiceAccountKey, DEFAULT_SCOPES};
use crate::modules::storage::{GcsClient, MemoryObjectStorage, ObjectStorage};

/// Bucket name reported by in-process storage when none is configured
const LOCAL_BUCKET: &str = "local";

/// Backends the request handlers run against
pub struct Backends {
    pub store: Arc<dyn DocumentStore>,
    /// `None` disables image uploads
    pub storage: Option<Arc<dyn ObjectStorage>>,
}

pub fn create_backends(config: &Config) -> anyhow::Result<Backends> {
    let token_manager = if config.needs_service_account() {
        let key = ServiceAccountKey::from_file(&config.firestore.credentials_path)?;
        tracing::info!(
            "Loaded service account {} from {}",
            key.client_email,
            config.firestore.credentials_path
        );
        Some(Arc::new(GoogleTokenManager::new(key, DEFAULT_SCOPES)?))
    } else {
        None
    };

    let store: Arc<dyn DocumentStore> = match config.firestore.backend {
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        StoreBackend::Firestore => {
            let project_id = config
                .firestore
                .project_id
                .clone()
                .or_else(|| {
                    token_manager
                        .as_ref()
                        .and_then(|manager| manager.project_id().map(str::to_string))
                })
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "FIRESTORE_PROJECT_ID is not set and the service account key has no project_id"
                    )
                })?;

            match (&config.firestore.emulator_host, &token_manager) {
                (Some(host), _) => {
                    tracing::warn!("Using Firestore emulator at {}", host);
                    Arc::new(FirestoreClient::emulator(
                        host,
                        &project_id,
                        &config.firestore.database_id,
                        config.firestore.request_timeout,
                    )?)
                }
                (None, Some(manager)) => Arc::new(FirestoreClient::new(
                    &project_id,
                    &config.firestore.database_id,
                    Arc::clone(manager),
                    config.firestore.request_timeout,
                )?),
                (None, None) => {
                    anyhow::bail!("Firestore requires service account credentials")
                }
            }
        }
    };
    tracing::info!("Document store initialized: {}", store.backend_tag());

    let storage: Option<Arc<dyn ObjectStorage>> = match config.firestore.backend {
        StoreBackend::Memory => Some(Arc::new(MemoryObjectStorage::new(
            config
                .storage
                .bucket
                .clone()
                .unwrap_or_else(|| LOCAL_BUCKET.to_string()),
            config.storage.public_base_url.clone(),
        ))),
        StoreBackend::Firestore => match (&config.storage.bucket, &token_manager) {
            (Some(bucket), Some(manager)) => Some(Arc::new(GcsClient::new(
                bucket.clone(),
                config.storage.public_base_url.clone(),
                Arc::clone(manager),
                config.firestore.request_timeout,
            )?)),
            _ => None,
        },
    };

    match &storage {
        Some(storage) => tracing::info!(
            "Object storage initialized for bucket: {}",
            storage.bucket_name()
        ),
        None => tracing::info!("Image uploads disabled (STORAGE_BUCKET not set)"),
    }

    Ok(Backends { store, storage })
}
