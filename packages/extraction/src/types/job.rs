//! Extraction job types - invocation handles, statuses and job metadata.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::location::StorageLocation;
use super::project::ProjectRef;

/// Handle returned when a job is submitted (the invocation ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(invocation_arn: impl Into<String>) -> Self {
        Self(invocation_arn.into())
    }

    pub fn invocation_arn(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to start one async extraction job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub input: StorageLocation,
    pub output: StorageLocation,
    pub project: ProjectRef,
}

/// Observed job status.
///
/// `Pending` -> `Success` | `Failure`; the terminal states are absorbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Created or in progress
    Pending,

    /// Finished; `metadata` points at the job metadata document
    Success { metadata: StorageLocation },

    /// Finished with a service or client error
    Failure { reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Short label for logs and status displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success { .. } => "Success",
            Self::Failure { .. } => "Failure",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The job metadata document written on success.
///
/// ```json
/// { "output_metadata": [ { "segment_metadata": [ { "custom_output_path": "s3://..." } ] } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub output_metadata: Vec<OutputMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputMetadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub segment_metadata: Vec<SegmentMetadata>,
}

// The service writes `null` for lists it has nothing to put in.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One segment of a processed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentMetadata {
    #[serde(default)]
    pub custom_output_path: Option<String>,
}

impl JobMetadata {
    /// Custom output pointer of the first segment of the first output, if any.
    pub fn first_custom_output_path(&self) -> Option<&str> {
        self.output_metadata
            .first()?
            .segment_metadata
            .first()?
            .custom_output_path
            .as_deref()
            .filter(|path| !path.is_empty())
    }
}
