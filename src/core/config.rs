use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub firestore: FirestoreConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which document store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// In-process store, data is lost on restart
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "DOCUMENT_STORE must be 'firestore' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub backend: StoreBackend,
    /// Falls back to the `project_id` of the service account key when unset
    pub project_id: Option<String>,
    pub database_id: String,
    /// Path to the service account key JSON
    pub credentials_path: String,
    /// `host:port` of a local emulator; disables authentication
    pub emulator_host: Option<String>,
    pub request_timeout: Duration,
}

/// Object storage for uploaded images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Uploads are disabled when no bucket is configured
    pub bucket: Option<String>,
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            firestore: FirestoreConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }

    /// Whether a service account key must be loaded at startup
    pub fn needs_service_account(&self) -> bool {
        let firestore = self.firestore.backend == StoreBackend::Firestore
            && self.firestore.emulator_host.is_none();
        let storage =
            self.firestore.backend == StoreBackend::Firestore && self.storage.bucket.is_some();
        firestore || storage
    }
}

impl AppConfig {
    const DEFAULT_PORT: u16 = 5000;
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| Self::DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl FirestoreConfig {
    const DEFAULT_DATABASE_ID: &'static str = "(default)";
    const DEFAULT_CREDENTIALS_PATH: &'static str = "key.json";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("DOCUMENT_STORE")
            .unwrap_or_else(|_| "firestore".to_string())
            .parse::<StoreBackend>()?;

        let project_id = env::var("FIRESTORE_PROJECT_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let database_id = env::var("FIRESTORE_DATABASE_ID")
            .unwrap_or_else(|_| Self::DEFAULT_DATABASE_ID.to_string());

        let credentials_path = env::var("GOOGLE_APPLICATION_CREDENTIALS")
            .unwrap_or_else(|_| Self::DEFAULT_CREDENTIALS_PATH.to_string());

        let emulator_host = env::var("FIRESTORE_EMULATOR_HOST")
            .ok()
            .filter(|s| !s.is_empty());

        let request_timeout_secs = env::var("FIRESTORE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FIRESTORE_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            backend,
            project_id,
            database_id,
            credentials_path,
            emulator_host,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

impl StorageConfig {
    const DEFAULT_PUBLIC_BASE_URL: &'static str = "https://storage.googleapis.com";

    pub fn from_env() -> Result<Self, String> {
        let bucket = env::var("STORAGE_BUCKET").ok().filter(|s| !s.is_empty());
        let public_base_url = env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_PUBLIC_BASE_URL.to_string());

        Ok(Self {
            bucket,
            public_base_url,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Arambha Catalog API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Categories and products for the Arambha furniture and interiors catalog".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "firestore".parse::<StoreBackend>(),
            Ok(StoreBackend::Firestore)
        );
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("https://arambha.in, http://localhost:3000,,"),
            vec!["https://arambha.in", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }
}
