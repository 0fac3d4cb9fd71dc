use std::path::Path;

use uuid::Uuid;

use crate::error::{AppError, Result};

/// Route prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/product-images";

/// Fallback recorded when a product is created with no image at all.
pub const PLACEHOLDER_URL: &str = "https://placehold.co/600x400";

/// Write uploaded image bytes under the upload directory as
/// `{uuid}{original extension}`. Returns the stored file name.
pub async fn save_product_image(
    upload_dir: &str,
    original_name: &str,
    data: &[u8],
) -> Result<String> {
    let file_name = storage_file_name(original_name, Uuid::new_v4());
    let path = Path::new(upload_dir).join(&file_name);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {}", e)))?;

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {}", e)))?;

    Ok(file_name)
}

/// Best-effort removal of a stored image when its product goes away. Only
/// URLs under our public prefix refer to local files; anything else is an
/// external reference and is left alone.
pub async fn delete_product_image(upload_dir: &str, img_url: &str) {
    let Some(file_name) = img_url.rsplit_once(&format!("{}/", PUBLIC_PREFIX)).map(|(_, f)| f)
    else {
        return;
    };

    // A slash here would escape the upload directory.
    if file_name.is_empty() || file_name.contains('/') {
        return;
    }

    let path = Path::new(upload_dir).join(file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove image {}: {}", path.display(), e);
    }
}

pub fn public_image_url(base_url: &str, file_name: &str) -> String {
    format!(
        "{}{}/{}",
        base_url.trim_end_matches('/'),
        PUBLIC_PREFIX,
        file_name
    )
}

fn storage_file_name(original_name: &str, id: Uuid) -> String {
    match Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", id, ext.to_lowercase()),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_keeps_the_extension() {
        let id = Uuid::new_v4();
        assert_eq!(storage_file_name("photo.PNG", id), format!("{}.png", id));
        assert_eq!(storage_file_name("archive.tar.gz", id), format!("{}.gz", id));
    }

    #[test]
    fn storage_name_without_extension_is_just_the_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(storage_file_name("photo", id), id.to_string());
    }

    #[test]
    fn public_url_joins_base_prefix_and_file() {
        assert_eq!(
            public_image_url("http://localhost:3000/", "abc.png"),
            "http://localhost:3000/product-images/abc.png"
        );
    }

    #[tokio::test]
    async fn saves_and_deletes_an_image_on_disk() {
        let dir = std::env::temp_dir().join("tienda-back-image-test");
        let dir = dir.to_str().unwrap();

        let file_name = save_product_image(dir, "photo.png", b"fake-bytes")
            .await
            .unwrap();
        let stored = std::path::Path::new(dir).join(&file_name);
        assert!(stored.exists());

        let url = public_image_url("http://localhost:3000", &file_name);
        delete_product_image(dir, &url).await;
        assert!(!stored.exists());
    }
}
