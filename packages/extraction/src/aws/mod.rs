//! Amazon Web Services backends.
//!
//! - [`S3ObjectStore`] implements [`ObjectStore`](crate::traits::store::ObjectStore) over S3
//! - [`BedrockDataAutomation`] implements both data automation traits over
//!   the Bedrock Data Automation control and runtime APIs
//!
//! Requires the `aws` feature.

mod bda;
mod s3;

pub use bda::BedrockDataAutomation;
pub use s3::S3ObjectStore;

use aws_config::meta::region::RegionProviderChain;
use aws_config::Region;
pub use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::error::ServiceError;

/// Region used when neither the caller nor the environment names one.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Load shared SDK configuration.
///
/// Region resolution order: `region`, then the SDK's default chain
/// (`AWS_REGION`, profile), then [`DEFAULT_REGION`].
pub async fn load_config(region: Option<String>) -> SdkConfig {
    let region = RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let config = aws_config::from_env().region(region).load().await;
    tracing::debug!(region = ?config.region(), "Loaded AWS configuration");
    config
}

/// Flatten an SDK error (and its source chain) into a service error.
pub(crate) fn sdk_error<E>(err: E) -> ServiceError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ServiceError::other(DisplayErrorContext(&err).to_string())
}
