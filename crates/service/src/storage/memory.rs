use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ImageStore;
use crate::errors::ServiceError;

/// In-memory store for tests; records every write.
#[derive(Default)]
pub struct MemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn write_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(filename).cloned()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, filename: &str, _content_type: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(filename) {
            return Err(ServiceError::Storage(format!("{filename} already exists")));
        }
        files.insert(filename.to_string(), bytes.to_vec());
        Ok(format!("/img/services/{filename}"))
    }
}
