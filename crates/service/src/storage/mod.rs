//! Storage abstractions for uploaded service images.
//!
//! The site has shipped with images on local disk and in an object-storage
//! bucket at different times, so writes go through a small trait. Each
//! backend takes the final filename and bytes and answers with the publicly
//! addressable path.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::errors::ServiceError;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under `filename` and return the public path/URL.
    async fn put(&self, filename: &str, content_type: &str, bytes: &[u8]) -> Result<String, ServiceError>;
}
