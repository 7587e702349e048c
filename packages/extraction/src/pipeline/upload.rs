//! Object store gateway - uploads documents and fetches job output.

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ExtractionError, Result};
use crate::traits::store::ObjectStore;
use crate::types::{config::UploadConfig, document::Document, location::StorageLocation};

/// Uploads documents under a deterministic key and reads results back.
pub struct ObjectStoreGateway<S: ObjectStore> {
    store: S,
    config: UploadConfig,
}

impl<S: ObjectStore> ObjectStoreGateway<S> {
    pub fn new(store: S, config: UploadConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Location a document with this name is uploaded to: `{prefix}/{name}`.
    pub fn input_location(&self, document_name: &str) -> Result<StorageLocation> {
        let prefix = self.config.input_prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            document_name.to_string()
        } else {
            format!("{prefix}/{document_name}")
        };
        StorageLocation::new(&self.config.bucket, key)
    }

    /// Location the job writes its output under for a given input.
    pub fn output_location(&self, input: &StorageLocation) -> StorageLocation {
        input.child(&self.config.output_suffix)
    }

    /// Write the document, then confirm it exists.
    ///
    /// A failed write is `UploadFailed`; a failed or negative existence
    /// check afterwards is `VerificationFailed`.
    pub async fn upload(&self, document: &Document) -> Result<StorageLocation> {
        let location = self.input_location(document.name())?;
        debug!(location = %location, bytes = document.len(), "Uploading document");

        self.store
            .put_object(
                &location,
                document.bytes().to_vec(),
                document.media_type().as_mime(),
            )
            .await
            .map_err(|source| ExtractionError::UploadFailed {
                location: location.to_string(),
                source,
            })?;

        match self.store.head_object(&location).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ExtractionError::VerificationFailed {
                    location: location.to_string(),
                    source: None,
                })
            }
            Err(source) => {
                return Err(ExtractionError::VerificationFailed {
                    location: location.to_string(),
                    source: Some(source),
                })
            }
        }

        info!(location = %location, "Document uploaded");
        Ok(location)
    }

    /// Whether an object exists at `location`.
    pub async fn exists(&self, location: &StorageLocation) -> Result<bool> {
        self.store
            .head_object(location)
            .await
            .map_err(|source| ExtractionError::VerificationFailed {
                location: location.to_string(),
                source: Some(source),
            })
    }

    /// Read raw bytes; a missing object is `NotFound`.
    pub async fn fetch(&self, location: &StorageLocation) -> Result<Vec<u8>> {
        self.store.get_object(location).await.map_err(|e| {
            if e.is_not_found() {
                ExtractionError::NotFound {
                    location: location.to_string(),
                }
            } else {
                ExtractionError::ResultFetchFailed {
                    location: location.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    /// Read and deserialize a JSON document.
    ///
    /// Both missing objects and malformed JSON are reported as
    /// `ResultFetchFailed` naming the location.
    pub async fn fetch_json<T: DeserializeOwned>(&self, location: &StorageLocation) -> Result<T> {
        let bytes = self.fetch(location).await.map_err(|e| match e {
            ExtractionError::NotFound { location } => ExtractionError::ResultFetchFailed {
                reason: "object not found".to_string(),
                location,
            },
            other => other,
        })?;

        serde_json::from_slice(&bytes).map_err(|e| ExtractionError::ResultFetchFailed {
            location: location.to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}
