//! Google Cloud Storage client
//!
//! Uses the JSON API directly. Each object is written by a single multipart upload
//! carrying both its metadata (`Cache-Control`, content type) and its bytes, with a
//! public-read ACL.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{ObjectStorage, StorageError, StorageResult, UploadObject};
use crate::modules::gcp::GoogleTokenManager;

const API_BASE_URL: &str = "https://storage.googleapis.com";

pub struct GcsClient {
    client: Client,
    api_base_url: String,
    bucket: String,
    public_base_url: String,
    token_manager: Arc<GoogleTokenManager>,
}

impl GcsClient {
    pub fn new(
        bucket: String,
        public_base_url: String,
        token_manager: Arc<GoogleTokenManager>,
        request_timeout: Duration,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| StorageError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: API_BASE_URL.to_string(),
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            token_manager,
        })
    }

    #[cfg(test)]
    fn with_api_base_url(mut self, api_base_url: String) -> Self {
        self.api_base_url = api_base_url;
        self
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }

    async fn send(&self, request: RequestBuilder) -> StorageResult<Response> {
        let token = self
            .token_manager
            .get_access_token()
            .await
            .map_err(|e| StorageError::Auth(e.to_string()))?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status { status, body });
        }

        Ok(response)
    }
}

/// `multipart/related` body: the JSON metadata part followed by the media part
fn multipart_related_body(
    boundary: &str,
    metadata: &Value,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
            boundary, metadata
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{}\r\nContent-Type: {}\r\n\r\n", boundary, content_type).as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[async_trait]
impl ObjectStorage for GcsClient {
    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    async fn upload_public(&self, object: UploadObject) -> StorageResult<String> {
        let size = object.data.len();
        let upload_url = format!(
            "{}/upload/storage/v1/b/{}/o",
            self.api_base_url, self.bucket
        );

        let metadata = json!({
            "name": object.key,
            "contentType": object.content_type,
            "cacheControl": object.cache_control,
        });
        let boundary = format!("arambha-{}", Uuid::new_v4().simple());
        let body =
            multipart_related_body(&boundary, &metadata, &object.content_type, &object.data);

        let upload = self
            .client
            .post(&upload_url)
            .query(&[("uploadType", "multipart"), ("predefinedAcl", "publicRead")])
            .header(
                header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body);
        self.send(upload).await?;

        let url = self.public_url(&object.key);
        info!("Stored public object {} ({} bytes)", url, size);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::Router;
    use std::sync::Mutex;

    use crate::modules::gcp::{ServiceAccountKey, DEFAULT_SCOPES};
    use crate::shared::test_helpers::spawn_http_fake;

    const TEST_PRIVATE_KEY: &str = include_str!("../gcp/testdata/test_service_account_key.pem");

    struct SeenUpload {
        path: String,
        query: String,
        content_type: String,
        body: Vec<u8>,
    }

    /// Client whose token endpoint and storage API are both served locally
    async fn fake_gcs(upload_status: StatusCode) -> (GcsClient, Arc<Mutex<Vec<SeenUpload>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
            let log = Arc::clone(&log);
            async move {
                if uri.path() == "/token" {
                    return (
                        StatusCode::OK,
                        axum::Json(json!({
                            "access_token": "gcs-token",
                            "expires_in": 3600,
                            "token_type": "Bearer"
                        })),
                    );
                }
                log.lock().unwrap().push(SeenUpload {
                    path: uri.path().to_string(),
                    query: uri.query().unwrap_or_default().to_string(),
                    content_type: headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string(),
                    body: body.to_vec(),
                });
                (upload_status, axum::Json(json!({"bucket": "arambha-media"})))
            }
        });
        let addr = spawn_http_fake(app).await;

        let key = ServiceAccountKey {
            project_id: Some("arambha-test".to_string()),
            private_key_id: None,
            private_key: TEST_PRIVATE_KEY.to_string(),
            client_email: "uploads@arambha-test.iam.gserviceaccount.com".to_string(),
            token_uri: format!("http://{}/token", addr),
        };
        let token_manager = Arc::new(GoogleTokenManager::new(key, DEFAULT_SCOPES).unwrap());
        let client = GcsClient::new(
            "arambha-media".to_string(),
            "https://storage.googleapis.com/".to_string(),
            token_manager,
            Duration::from_secs(5),
        )
        .unwrap()
        .with_api_base_url(format!("http://{}", addr));
        (client, seen)
    }

    fn image() -> UploadObject {
        UploadObject {
            key: "furniture/cat1/chair-1.jpg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            content_type: "image/jpeg".to_string(),
            cache_control: "public, max-age=31536000".to_string(),
        }
    }

    #[test]
    fn test_multipart_related_body_layout() {
        let body = multipart_related_body("b0", &json!({"name": "a.png"}), "image/png", b"PNG");
        assert_eq!(
            body,
            b"--b0\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"name\":\"a.png\"}\r\n\
              --b0\r\nContent-Type: image/png\r\n\r\nPNG\r\n--b0--\r\n"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn test_upload_sends_metadata_and_media_in_one_request() {
        let (client, seen) = fake_gcs(StatusCode::OK).await;

        let url = client.upload_public(image()).await.unwrap();
        assert_eq!(
            url,
            "https://storage.googleapis.com/arambha-media/furniture/cat1/chair-1.jpg"
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let upload = &seen[0];
        assert_eq!(upload.path, "/upload/storage/v1/b/arambha-media/o");
        assert!(upload.query.contains("uploadType=multipart"));
        assert!(upload.query.contains("predefinedAcl=publicRead"));

        let boundary = upload
            .content_type
            .strip_prefix("multipart/related; boundary=")
            .unwrap();
        let metadata = json!({
            "name": "furniture/cat1/chair-1.jpg",
            "contentType": "image/jpeg",
            "cacheControl": "public, max-age=31536000",
        });
        assert_eq!(
            upload.body,
            multipart_related_body(boundary, &metadata, "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_is_reported() {
        let (client, seen) = fake_gcs(StatusCode::FORBIDDEN).await;

        let err = client.upload_public(image()).await.unwrap_err();
        assert!(matches!(err, StorageError::Status { status: 403, .. }));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
