use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::ImageStore;
use crate::errors::ServiceError;

/// Writes uploads to a directory under the served frontend tree.
pub struct LocalImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let mut public_prefix: String = public_prefix.into();
        while public_prefix.ends_with('/') {
            public_prefix.pop();
        }
        Self { root: root.into(), public_prefix }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, filename: &str, _content_type: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let dest = self.root.join(filename);

        // Never clobber an already-stored image; a name collision is an error.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&dest)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    ServiceError::Storage(format!("{filename} already exists"))
                }
                _ => ServiceError::Storage(e.to_string()),
            })?;
        file.write_all(bytes)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        info!(path = %dest.display(), size = bytes.len(), "stored uploaded image");
        Ok(format!("{}/{}", self.public_prefix, filename))
    }
}
