//! Extraction job client - starts async jobs.

use tracing::info;

use crate::error::{ExtractionError, Result};
use crate::traits::automation::DataAutomationRuntime;
use crate::types::{
    job::{InvocationRequest, JobHandle},
    location::StorageLocation,
    project::ProjectRef,
};

/// Submits extraction jobs against a project. Never retries.
pub struct JobClient<R: DataAutomationRuntime> {
    runtime: R,
}

impl<R: DataAutomationRuntime> JobClient<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Start a job reading `input` and writing under `output`.
    ///
    /// The caller is expected to have verified that `input` exists.
    pub async fn submit(
        &self,
        input: &StorageLocation,
        output: &StorageLocation,
        project: &ProjectRef,
    ) -> Result<JobHandle> {
        let request = InvocationRequest {
            input: input.clone(),
            output: output.clone(),
            project: project.clone(),
        };

        let handle = self
            .runtime
            .invoke_async(&request)
            .await
            .map_err(ExtractionError::SubmissionFailed)?;

        info!(
            invocation_arn = %handle,
            input = %input,
            project_arn = %project.arn,
            "Extraction job submitted"
        );
        Ok(handle)
    }
}
