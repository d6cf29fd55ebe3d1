//! Image upload: validate type and size, then hand bytes to an
//! [`ImageStore`](crate::storage::ImageStore). Validation always runs before
//! the store is touched.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::errors::ServiceError;
use crate::storage::ImageStore;

/// MIME types accepted for service images.
pub const VALID_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"];

/// Upload size cap: 5MB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub path: String,
    pub filename: String,
}

pub fn validate_upload(content_type: &str, size: usize) -> Result<(), ServiceError> {
    if !VALID_TYPES.contains(&content_type) {
        return Err(ServiceError::Validation(
            "invalid file type; use JPEG, PNG, WEBP or GIF".into(),
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ServiceError::Validation("file too large; maximum size is 5MB".into()));
    }
    Ok(())
}

/// Collision-resistant filename: `service-<unix-millis>.<ext>`, keeping the
/// extension of the uploaded file.
pub fn unique_filename(original_name: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let extension = original_name.rsplit('.').next().filter(|e| !e.is_empty() && *e != original_name);
    match extension {
        Some(ext) => format!("service-{millis}.{}", ext.to_ascii_lowercase()),
        None => format!("service-{millis}"),
    }
}

/// Validate and persist one uploaded image, returning its public path.
pub async fn store_image(
    store: &dyn ImageStore,
    original_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<StoredImage, ServiceError> {
    validate_upload(content_type, bytes.len())?;
    let filename = unique_filename(original_name);
    let path = store.put(&filename, content_type, bytes).await?;
    Ok(StoredImage { path, filename })
}
