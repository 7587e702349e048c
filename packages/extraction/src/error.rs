//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every variant is terminal
//! for the request that produced it.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running the extraction workflow.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Writing the document to object storage failed
    #[error("error uploading to {location}: {source}")]
    UploadFailed {
        location: String,
        #[source]
        source: ServiceError,
    },

    /// The document was written but could not be confirmed afterwards
    #[error("file upload verification failed for {location}")]
    VerificationFailed {
        location: String,
        #[source]
        source: Option<ServiceError>,
    },

    /// Object does not exist
    #[error("object not found: {location}")]
    NotFound { location: String },

    /// The service rejected the async invocation
    #[error("error invoking data automation: {0}")]
    SubmissionFailed(#[source] ServiceError),

    /// A status query failed (not retried)
    #[error("status check failed for {invocation_arn}: {source}")]
    StatusCheckFailed {
        invocation_arn: String,
        #[source]
        source: ServiceError,
    },

    /// The job reached a terminal failure state
    #[error("extraction job {invocation_arn} failed: {reason}")]
    JobFailed {
        invocation_arn: String,
        reason: String,
    },

    /// Polling gave up before the job reached a terminal state
    #[error(
        "timed out waiting for job {invocation_arn} after {attempts} status checks ({elapsed:?})"
    )]
    Timeout {
        invocation_arn: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// Job metadata has no segment carrying a custom output path
    #[error("custom output path not found in job metadata at {location}")]
    OutputPathMissing { location: String },

    /// The result document could not be fetched or decoded
    #[error("error fetching output from {location}: {reason}")]
    ResultFetchFailed { location: String, reason: String },

    /// Creating a blueprint or project failed
    #[error("failed to create {resource} '{name}': {source}")]
    ProvisioningFailed {
        resource: ResourceKind,
        name: String,
        #[source]
        source: ServiceError,
    },

    /// Listing existing blueprints or projects failed
    #[error("could not check whether {resource} '{name}' exists: {source}")]
    ProvisioningCheckFailed {
        resource: ResourceKind,
        name: String,
        #[source]
        source: ServiceError,
    },

    /// URI is not of the form `s3://bucket/key`
    #[error("invalid storage location '{uri}': {reason}")]
    InvalidLocation { uri: String, reason: &'static str },

    /// Only PDF and PNG documents are accepted
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Zero-byte upload
    #[error("document '{name}' is empty")]
    EmptyDocument { name: String },

    /// File name has no usable final component
    #[error("invalid document name: {0:?}")]
    InvalidDocumentName(String),
}

/// Errors reported by a backend (object store or data automation service).
///
/// Backends classify the two conditions the workflow reacts to
/// (`AlreadyExists`, `NotFound`); everything else is opaque.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Create call conflicted with an existing resource
    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Target resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other backend failure
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    /// Wrap a plain message as an opaque backend error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into())
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Which provisioned resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Blueprint,
    Project,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blueprint => f.write_str("blueprint"),
            Self::Project => f.write_str("project"),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for backend calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_classification() {
        assert!(ServiceError::AlreadyExists("bp".into()).is_already_exists());
        assert!(ServiceError::NotFound("key".into()).is_not_found());

        let other = ServiceError::other("throttled");
        assert!(!other.is_already_exists());
        assert!(!other.is_not_found());
        assert_eq!(other.to_string(), "throttled");
    }

    #[test]
    fn test_provisioning_error_message_names_resource() {
        let err = ExtractionError::ProvisioningCheckFailed {
            resource: ResourceKind::Blueprint,
            name: "custom_payslip".into(),
            source: ServiceError::other("access denied"),
        };
        assert_eq!(
            err.to_string(),
            "could not check whether blueprint 'custom_payslip' exists: access denied"
        );
    }
}
