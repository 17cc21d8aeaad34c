//! File Storage
//!
//! Path, content-type and size-budget logic for the two image buckets,
//! plus the store contract itself. Pixel work (resizing, re-encoding)
//! happens before bytes reach this module; the profiles here are the
//! budgets a prepared upload must already satisfy.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::domain::{DomainError, DomainResult};

pub const BUCKET_AVATARS: &str = "avatars";
pub const BUCKET_ITEM_IMAGES: &str = "item-images";

/// Signed item-image URLs expire after one hour
pub const ITEM_IMAGE_URL_TTL_SECS: u64 = 3600;

const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Size and dimension budget for a prepared image upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionProfile {
    pub max_bytes: usize,
    pub max_dimension: u32,
    pub initial_quality: f32,
    /// Content type the preparation step targets
    pub target_type: &'static str,
}

/// Avatars are small: 200 KiB, 400 px
pub const AVATAR_PROFILE: CompressionProfile = CompressionProfile {
    max_bytes: 200 * 1024,
    max_dimension: 400,
    initial_quality: 0.85,
    target_type: "image/webp",
};

/// Item photos: 500 KiB, 1200 px
pub const ITEM_PHOTO_PROFILE: CompressionProfile = CompressionProfile {
    max_bytes: 500 * 1024,
    max_dimension: 1200,
    initial_quality: 0.8,
    target_type: "image/webp",
};

impl CompressionProfile {
    /// Check a prepared upload against this budget, before any gateway
    /// call
    pub fn accept(&self, len: usize, content_type: &str) -> DomainResult<()> {
        if !is_accepted_image_type(content_type) {
            return Err(DomainError::Invalid(format!(
                "unsupported image type: {}",
                content_type
            )));
        }
        if len > self.max_bytes {
            return Err(DomainError::Invalid(format!(
                "image is {} bytes, budget is {}",
                len, self.max_bytes
            )));
        }
        Ok(())
    }
}

pub fn is_accepted_image_type(content_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&content_type)
}

/// File extension for a content type; unknown types fall back to webp,
/// the preparation target
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "webp",
    }
}

/// Content type guessed from a storage path
pub fn content_type_for_path(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn avatar_path(user_id: &str, content_type: &str) -> String {
    format!("{}/avatar.{}", user_id, extension_for(content_type))
}

pub fn item_image_path(household_id: &str, item_id: &str, content_type: &str) -> String {
    format!("{}/{}.{}", household_id, item_id, extension_for(content_type))
}

/// Inline data-URL preview of image bytes
pub fn to_data_url(bytes: &[u8], content_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", content_type, encoded)
}

/// Blob storage contract: two buckets of pathed objects
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store bytes under `bucket/path`, replacing any existing object;
    /// returns the path
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<String>;

    /// Stable public URL (public buckets only)
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Expiring URL for a private object
    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> DomainResult<String>;

    async fn remove(&self, bucket: &str, path: &str) -> DomainResult<()>;
}

/// Validate an avatar against its profile and store it under the
/// user's fixed avatar path
pub async fn upload_avatar(
    store: &dyn FileStore,
    user_id: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> DomainResult<String> {
    if let Err(e) = AVATAR_PROFILE.accept(bytes.len(), content_type) {
        log::warn!("rejected avatar upload for {}: {}", user_id, e);
        return Err(e);
    }
    let path = avatar_path(user_id, content_type);
    log::debug!("uploading avatar to {}/{}", BUCKET_AVATARS, path);
    store.upload(BUCKET_AVATARS, &path, bytes, content_type).await
}

/// Validate an item photo against its profile and store it under the
/// household-scoped item path
pub async fn upload_item_image(
    store: &dyn FileStore,
    household_id: &str,
    item_id: &str,
    bytes: Vec<u8>,
    content_type: &str,
) -> DomainResult<String> {
    if let Err(e) = ITEM_PHOTO_PROFILE.accept(bytes.len(), content_type) {
        log::warn!("rejected item image upload for {}: {}", item_id, e);
        return Err(e);
    }
    let path = item_image_path(household_id, item_id, content_type);
    log::debug!("uploading item image to {}/{}", BUCKET_ITEM_IMAGES, path);
    store.upload(BUCKET_ITEM_IMAGES, &path, bytes, content_type).await
}

const PATH_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'?').add(b'#');

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory blob store for tests and demos
#[derive(Default)]
pub struct MemoryFileStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("file store poisoned").len()
    }

    pub fn content_type_of(&self, bucket: &str, path: &str) -> Option<String> {
        self.objects
            .lock()
            .expect("file store poisoned")
            .get(&(bucket.to_string(), path.to_string()))
            .map(|o| o.content_type.clone())
    }

    pub fn read(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("file store poisoned")
            .get(&(bucket.to_string(), path.to_string()))
            .map(|o| o.bytes.clone())
    }

    fn url(&self, bucket: &str, path: &str, suffix: &str) -> String {
        format!(
            "memory://{}/{}{}",
            bucket,
            utf8_percent_encode(path, PATH_ENCODE_SET),
            suffix
        )
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<String> {
        self.objects.lock().expect("file store poisoned").insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.url(bucket, path, "")
    }

    async fn create_signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> DomainResult<String> {
        let objects = self.objects.lock().expect("file store poisoned");
        let key = (bucket.to_string(), path.to_string());
        if !objects.contains_key(&key) {
            return Err(DomainError::NotFound(format!("{}/{}", bucket, path)));
        }
        Ok(self.url(bucket, path, &format!("?expires={}", ttl_secs)))
    }

    async fn remove(&self, bucket: &str, path: &str) -> DomainResult<()> {
        self.objects
            .lock()
            .expect("file store poisoned")
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_rejects_oversized_upload() {
        let err = ITEM_PHOTO_PROFILE
            .accept(ITEM_PHOTO_PROFILE.max_bytes + 1, "image/webp")
            .unwrap_err();
        assert!(matches!(err, DomainError::Invalid(_)));
        assert!(ITEM_PHOTO_PROFILE.accept(1024, "image/webp").is_ok());
    }

    #[test]
    fn test_profile_rejects_non_image_types() {
        let err = AVATAR_PROFILE.accept(10, "application/pdf").unwrap_err();
        assert!(matches!(err, DomainError::Invalid(_)));
    }

    #[test]
    fn test_paths_and_extensions() {
        assert_eq!(avatar_path("user-1", "image/png"), "user-1/avatar.png");
        assert_eq!(
            item_image_path("hh-1", "items-7", "image/jpeg"),
            "hh-1/items-7.jpg"
        );
        assert_eq!(extension_for("image/x-unknown"), "webp");
        assert_eq!(content_type_for_path("hh-1/items-7.jpg"), "image/jpeg");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(
            to_data_url(b"abc", "image/webp"),
            "data:image/webp;base64,YWJj"
        );
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryFileStore::new();
        let path = upload_item_image(&store, "hh-1", "items-7", vec![1, 2, 3], "image/webp")
            .await
            .unwrap();
        assert_eq!(path, "hh-1/items-7.webp");
        assert_eq!(
            store.content_type_of(BUCKET_ITEM_IMAGES, &path).as_deref(),
            Some("image/webp")
        );

        let url = store
            .create_signed_url(BUCKET_ITEM_IMAGES, &path, ITEM_IMAGE_URL_TTL_SECS)
            .await
            .unwrap();
        assert!(url.starts_with("memory://item-images/"));
        assert!(url.ends_with("?expires=3600"));

        assert_eq!(store.read(BUCKET_ITEM_IMAGES, &path), Some(vec![1, 2, 3]));

        store.remove(BUCKET_ITEM_IMAGES, &path).await.unwrap();
        assert!(store
            .create_signed_url(BUCKET_ITEM_IMAGES, &path, 60)
            .await
            .is_err());
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_avatar_never_reaches_the_store() {
        let store = MemoryFileStore::new();
        let oversized = vec![0u8; AVATAR_PROFILE.max_bytes + 1];
        assert!(upload_avatar(&store, "user-1", oversized, "image/webp")
            .await
            .is_err());
        assert_eq!(store.object_count(), 0);
    }
}
