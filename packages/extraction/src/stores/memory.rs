//! In-memory object storage for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ServiceError, ServiceResult};
use crate::traits::store::ObjectStore;
use crate::types::location::StorageLocation;

/// A stored blob with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory object storage keyed by location.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<StorageLocation, StoredObject>>,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Seed an object directly (e.g. job output written by the service).
    pub fn insert(&self, location: StorageLocation, body: impl Into<Vec<u8>>, content_type: &str) {
        self.objects.write().unwrap().insert(
            location,
            StoredObject {
                body: body.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    /// Seed a JSON document.
    pub fn insert_json(&self, location: StorageLocation, value: &serde_json::Value) {
        self.insert(location, value.to_string(), "application/json");
    }

    /// Get a stored object with its metadata.
    pub fn object(&self, location: &StorageLocation) -> Option<StoredObject> {
        self.objects.read().unwrap().get(location).cloned()
    }

    /// Get the number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        location: &StorageLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        self.insert(location.clone(), body, content_type);
        Ok(())
    }

    async fn head_object(&self, location: &StorageLocation) -> ServiceResult<bool> {
        Ok(self.objects.read().unwrap().contains_key(location))
    }

    async fn get_object(&self, location: &StorageLocation) -> ServiceResult<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(location)
            .map(|object| object.body.clone())
            .ok_or_else(|| ServiceError::NotFound(location.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(key: &str) -> StorageLocation {
        StorageLocation::new("bucket", key).unwrap()
    }

    #[tokio::test]
    async fn test_put_head_get() {
        let store = MemoryObjectStore::new();
        let location = loc("input_data/a.pdf");

        assert!(!store.head_object(&location).await.unwrap());

        store
            .put_object(&location, b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert!(store.head_object(&location).await.unwrap());
        assert_eq!(store.get_object(&location).await.unwrap(), b"%PDF-1.7");
        assert_eq!(
            store.object(&location).unwrap().content_type,
            "application/pdf"
        );
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store.get_object(&loc("missing.json")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryObjectStore::new();
        let location = loc("k");
        store.put_object(&location, vec![1], "a/b").await.unwrap();
        store.put_object(&location, vec![2], "a/b").await.unwrap();
        assert_eq!(store.get_object(&location).await.unwrap(), vec![2]);
    }
}
