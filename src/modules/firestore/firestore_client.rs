//! Firestore REST v1 client
//!
//! Writes go through `documents:commit` so that server timestamps can be applied
//! as field transforms and existence preconditions enforced by the database.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::value::{decode_fields, encode_field};
use super::{
    auto_id, CollectionPath, DocumentFields, DocumentPath, DocumentStore, StoreError, StoreResult,
    StoredDocument,
};
use crate::modules::gcp::GoogleTokenManager;

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: u32 = 300;
/// The emulator accepts this bearer token as an admin identity that bypasses security rules
const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// How requests are authenticated
enum Auth {
    ServiceAccount(Arc<GoogleTokenManager>),
    Emulator,
}

pub struct FirestoreClient {
    client: Client,
    base_url: String,
    /// `projects/{project}/databases/{database}`
    database: String,
    auth: Auth,
}

impl FirestoreClient {
    /// Client for the managed Firestore service
    pub fn new(
        project_id: &str,
        database_id: &str,
        token_manager: Arc<GoogleTokenManager>,
        request_timeout: Duration,
    ) -> StoreResult<Self> {
        Self::build(
            PRODUCTION_BASE_URL.to_string(),
            project_id,
            database_id,
            Auth::ServiceAccount(token_manager),
            request_timeout,
        )
    }

    /// Client for a local Firestore emulator (`host:port`), over plain HTTP
    pub fn emulator(
        emulator_host: &str,
        project_id: &str,
        database_id: &str,
        request_timeout: Duration,
    ) -> StoreResult<Self> {
        Self::build(
            format!("http://{}/v1", emulator_host.trim_end_matches('/')),
            project_id,
            database_id,
            Auth::Emulator,
            request_timeout,
        )
    }

    fn build(
        base_url: String,
        project_id: &str,
        database_id: &str,
        auth: Auth,
        request_timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            database: format!("projects/{}/databases/{}", project_id, database_id),
            auth,
        })
    }

    fn document_name(&self, document: &DocumentPath) -> String {
        format!("{}/documents/{}", self.database, document)
    }

    fn collection_url(&self, collection: &CollectionPath) -> String {
        format!(
            "{}/{}/documents/{}",
            self.base_url,
            self.database,
            encode_segments(collection.segments())
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> StoreResult<RequestBuilder> {
        match &self.auth {
            Auth::ServiceAccount(token_manager) => {
                let token = token_manager
                    .get_access_token()
                    .await
                    .map_err(|e| StoreError::Auth(e.to_string()))?;
                Ok(request.bearer_auth(token))
            }
            Auth::Emulator => Ok(request.bearer_auth(EMULATOR_TOKEN)),
        }
    }

    async fn commit(&self, write: Value, context: &str) -> StoreResult<()> {
        let url = format!("{}/{}/documents:commit", self.base_url, self.database);
        let request = self.client.post(&url).json(&json!({ "writes": [write] }));

        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        check_status(response, context).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: DocumentFields,
    ) -> StoreResult<String> {
        let document = collection.doc(auto_id());
        let name = self.document_name(&document);

        self.commit(create_write(&name, &fields), &name).await?;

        debug!("Created Firestore document {}", name);
        Ok(document.id().to_string())
    }

    async fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<StoredDocument>> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let request = self.client.get(&url).query(&query);
            let response = self
                .authorize(request)
                .await?
                .send()
                .await
                .map_err(|e| StoreError::Request(e.to_string()))?;

            let page: ListDocumentsResponse = check_status(response, &url)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            for raw in page.documents {
                documents.push(StoredDocument {
                    id: document_id_from_name(&raw.name).to_string(),
                    fields: decode_fields(&raw.fields)?,
                });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            "Listed {} Firestore documents under {}",
            documents.len(),
            collection
        );
        Ok(documents)
    }

    async fn update_document(
        &self,
        document: &DocumentPath,
        fields: DocumentFields,
    ) -> StoreResult<()> {
        let name = self.document_name(document);
        self.commit(update_write(&name, &fields), &name).await
    }

    async fn delete_document(&self, document: &DocumentPath) -> StoreResult<()> {
        let name = self.document_name(document);
        self.commit(json!({ "delete": name }), &name).await
    }
}

async fn check_status(response: Response, context: &str) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(context.to_string()),
        StatusCode::CONFLICT => StoreError::AlreadyExists(context.to_string()),
        _ => StoreError::Status {
            status: status.as_u16(),
            body,
        },
    })
}

fn encode_segments(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn document_id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Value fields and server-timestamp transforms of a write
fn split_fields(fields: &DocumentFields) -> (Map<String, Value>, Vec<Value>) {
    let mut values = Map::new();
    let mut transforms = Vec::new();

    for (name, value) in fields.iter() {
        match encode_field(value) {
            Some(encoded) => {
                values.insert(name.to_string(), encoded);
            }
            None => transforms.push(json!({
                "fieldPath": name,
                "setToServerValue": "REQUEST_TIME",
            })),
        }
    }

    (values, transforms)
}

fn create_write(name: &str, fields: &DocumentFields) -> Value {
    let (values, transforms) = split_fields(fields);
    json!({
        "update": { "name": name, "fields": values },
        "updateTransforms": transforms,
        "currentDocument": { "exists": false },
    })
}

fn update_write(name: &str, fields: &DocumentFields) -> Value {
    let (values, transforms) = split_fields(fields);
    let mask: Vec<&String> = values.keys().collect();
    json!({
        "update": { "name": name, "fields": values },
        "updateMask": { "fieldPaths": mask },
        "updateTransforms": transforms,
        "currentDocument": { "exists": true },
    })
}
