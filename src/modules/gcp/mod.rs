//! Google Cloud service account authentication
//!
//! Shared by the Firestore and Cloud Storage clients.

mod credentials;
mod token_manager;

pub use credentials::ServiceAccountKey;
pub use token_manager::{GoogleTokenManager, DEFAULT_SCOPES};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(String),

    #[error("Failed to fetch token: {0}")]
    Fetch(String),

    #[error("Failed to parse token response: {0}")]
    Parse(String),
}
