use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::storage::StorageClient;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

const PHOTO_URL_TTL_SECS: u64 = 30 * 60;

/// Store an uploaded plate photo and return its storage key.
pub async fn store_plate_photo(storage: &dyn StorageClient, img: UploadItem) -> anyhow::Result<String> {
    anyhow::ensure!(!img.body.is_empty(), "empty photo upload");
    let ext = ext_from_mime(&img.content_type).context("unsupported photo type")?;
    let key = format!("plates/{}.{}", Uuid::new_v4(), ext);
    storage
        .put_object(&key, img.body, &img.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

/// URL a client can fetch the photo from.
pub async fn photo_url(storage: &dyn StorageClient, key: &str) -> anyhow::Result<String> {
    storage
        .presign_get(key, PHOTO_URL_TTL_SECS)
        .await
        .with_context(|| format!("presign url for key {}", key))
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
