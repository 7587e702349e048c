//! Object storage trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::types::location::StorageLocation;

/// Blob storage with put/head/get semantics.
///
/// Implementations report a missing object from `get_object` as
/// [`ServiceError::NotFound`](crate::error::ServiceError::NotFound).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `location`, replacing any existing object.
    async fn put_object(
        &self,
        location: &StorageLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()>;

    /// Whether an object exists at `location`.
    async fn head_object(&self, location: &StorageLocation) -> ServiceResult<bool>;

    /// Read the object at `location`.
    async fn get_object(&self, location: &StorageLocation) -> ServiceResult<Vec<u8>>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn put_object(
        &self,
        location: &StorageLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        (**self).put_object(location, body, content_type).await
    }

    async fn head_object(&self, location: &StorageLocation) -> ServiceResult<bool> {
        (**self).head_object(location).await
    }

    async fn get_object(&self, location: &StorageLocation) -> ServiceResult<Vec<u8>> {
        (**self).get_object(location).await
    }
}
