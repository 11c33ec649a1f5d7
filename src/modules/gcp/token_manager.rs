use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{ServiceAccountKey, TokenError};

/// OAuth scopes needed by the catalog: Firestore and Cloud Storage
pub const DEFAULT_SCOPES: &str = "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/devstorage.read_write";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Response from the Google OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(rename = "token_type")]
    pub _token_type: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Cached token with expiration tracking
struct TokenCache {
    token: TokenResponse,
    fetched_at: Instant,
}

impl TokenCache {
    /// The access token, unless it expires within `refresh_margin`
    fn valid_token(&self, refresh_margin: Duration) -> Option<&str> {
        let expires_in = Duration::from_secs(self.token.expires_in);
        (self.fetched_at.elapsed() + refresh_margin < expires_in)
            .then_some(self.token.access_token.as_str())
    }
}

/// Manages service account access tokens with caching
pub struct GoogleTokenManager {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scopes: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<TokenCache>>>,
    /// Refresh token this many seconds before expiration
    refresh_margin: Duration,
}

impl GoogleTokenManager {
    pub fn new(key: ServiceAccountKey, scopes: &str) -> Result<Self, TokenError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| TokenError::Credentials(format!("invalid private key: {}", e)))?;

        Ok(Self {
            key,
            signing_key,
            scopes: scopes.to_string(),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            refresh_margin: Duration::from_secs(60),
        })
    }

    pub fn project_id(&self) -> Option<&str> {
        self.key.project_id.as_deref()
    }

    /// Get a valid access token, fetching a new one if necessary
    pub async fn get_access_token(&self) -> Result<String, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache
                .as_ref()
                .and_then(|cached| cached.valid_token(self.refresh_margin))
            {
                tracing::debug!("Using cached Google access token");
                return Ok(token.to_string());
            }
        }

        let mut cache = self.cache.write().await;
        // A concurrent caller may have refreshed it while this one waited for the lock
        if let Some(token) = cache
            .as_ref()
            .and_then(|cached| cached.valid_token(self.refresh_margin))
        {
            return Ok(token.to_string());
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cache = Some(TokenCache {
            token,
            fetched_at: Instant::now(),
        });
        Ok(access_token)
    }

    fn sign_assertion(&self) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scopes,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Exchange a signed assertion for a new access token
    async fn fetch_token(&self) -> Result<TokenResponse, TokenError> {
        tracing::debug!("Fetching new Google access token from {}", self.key.token_uri);

        let assertion = self.sign_assertion()?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| TokenError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Fetch(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::Parse(e.to_string()))?;

        tracing::info!(
            "Fetched new Google access token for {}, expires in {} seconds",
            self.key.client_email,
            token_response.expires_in
        );

        Ok(token_response)
    }
}
