use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::sdk_error;
use crate::error::{ServiceError, ServiceResult};
use crate::traits::store::ObjectStore;
use crate::types::location::StorageLocation;

/// Object storage backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self::from_client(Client::new(config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        location: &StorageLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        self.client
            .put_object()
            .bucket(location.bucket())
            .key(location.key())
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    async fn head_object(&self, location: &StorageLocation) -> ServiceResult<bool> {
        let result = self
            .client
            .head_object()
            .bucket(location.bucket())
            .key(location.key())
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(sdk_error(err)),
        }
    }

    async fn get_object(&self, location: &StorageLocation) -> ServiceResult<Vec<u8>> {
        let output = match self
            .client
            .get_object()
            .bucket(location.bucket())
            .key(location.key())
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Err(ServiceError::NotFound(location.to_string()));
            }
            Err(err) => return Err(sdk_error(err)),
        };

        let body = output.body.collect().await.map_err(sdk_error)?;
        Ok(body.into_bytes().to_vec())
    }
}
