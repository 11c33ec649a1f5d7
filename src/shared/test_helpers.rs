use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use crate::modules::firestore::MemoryDocumentStore;
use crate::modules::storage::{MemoryObjectStorage, ObjectStorage};
use crate::routes::{api_router, AppServices};

pub const TEST_BUCKET: &str = "arambha-test";
pub const TEST_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";
pub const TEST_MAX_UPLOAD_SIZE: usize = 1024 * 1024;

/// Router over in-memory backends, with handles to inspect what was written
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryDocumentStore>,
    pub storage: Arc<MemoryObjectStorage>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let storage = Arc::new(MemoryObjectStorage::new(TEST_BUCKET, TEST_PUBLIC_BASE_URL));

    let services = AppServices::new(
        store.clone(),
        Some(storage.clone() as Arc<dyn ObjectStorage>),
    );
    let server = TestServer::new(api_router(&services, TEST_MAX_UPLOAD_SIZE))
        .expect("failed to start test server");

    TestApp {
        server,
        store,
        storage,
    }
}

/// Serve `app` on an ephemeral local port, for clients that make real HTTP calls
pub async fn spawn_http_fake(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake server");
    let addr = listener.local_addr().expect("fake server has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server failed");
    });
    addr
}
