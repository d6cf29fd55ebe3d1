//! Hero carousel images: list files from a fixed directory under the served
//! frontend tree. A missing directory is not an error, the carousel just has
//! nothing to rotate.

use std::path::Path;

use crate::errors::ServiceError;

/// File extensions treated as images when scanning the hero directory.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif"];

/// List public paths (`/img/hero/<file>`) of the hero images, sorted by
/// filename so the carousel order is stable.
pub async fn list_hero_images(dir: &Path) -> Result<Vec<String>, ServiceError> {
    if tokio::fs::metadata(dir).await.is_err() {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ServiceError::Storage(e.to_string()))?;

    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| ServiceError::Storage(e.to_string()))? {
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            images.push(format!("/img/hero/{name}"));
        }
    }

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("nope");
        let images = list_hero_images(&ghost).await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn lists_only_image_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.webp", "a.jpg", "notes.txt", "c.PNG", "noext"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let images = list_hero_images(dir.path()).await.unwrap();
        assert_eq!(images, vec!["/img/hero/a.jpg", "/img/hero/b.webp", "/img/hero/c.PNG"]);
    }
}
