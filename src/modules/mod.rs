//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for the document store, object storage and
//! the Google credentials they share.

pub mod firestore;
pub mod gcp;
pub mod storage;
