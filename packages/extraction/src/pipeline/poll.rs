//! Job status poller.
//!
//! Checks job status on a fixed interval until the job reaches a terminal
//! state. Waiting is bounded twice: by an overall deadline and by a maximum
//! number of status checks. Only `Pending` is retried; a failed status
//! check ends the wait immediately.

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::pipeline::upload::ObjectStoreGateway;
use crate::traits::{automation::DataAutomationRuntime, store::ObjectStore};
use crate::types::{
    config::PollConfig,
    job::{JobHandle, JobMetadata, JobStatus},
    location::StorageLocation,
};

/// A job that finished successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedJob {
    /// Job metadata document written by the service
    pub metadata: StorageLocation,

    /// Number of status checks issued, including the final one
    pub status_checks: u32,
}

/// Polls job status until a terminal state.
pub struct JobPoller<R: DataAutomationRuntime> {
    runtime: R,
    config: PollConfig,
}

impl<R: DataAutomationRuntime> JobPoller<R> {
    pub fn new(runtime: R, config: PollConfig) -> Self {
        Self { runtime, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// A single status check.
    pub async fn poll(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.runtime
            .get_status(handle)
            .await
            .map_err(|source| ExtractionError::StatusCheckFailed {
                invocation_arn: handle.to_string(),
                source,
            })
    }

    /// Poll until the job succeeds, fails, or the deadline or attempt cap is reached.
    pub async fn wait(&self, handle: &JobHandle) -> Result<CompletedJob> {
        let started = Instant::now();
        let mut status_checks = 0u32;

        loop {
            status_checks += 1;
            let status = self.poll(handle).await?;
            debug!(invocation_arn = %handle, attempt = status_checks, %status, "Job status");

            match status {
                JobStatus::Success { metadata } => {
                    info!(
                        invocation_arn = %handle,
                        status_checks,
                        metadata = %metadata,
                        "Extraction job succeeded"
                    );
                    return Ok(CompletedJob {
                        metadata,
                        status_checks,
                    });
                }
                JobStatus::Failure { reason } => {
                    warn!(invocation_arn = %handle, %reason, "Extraction job failed");
                    return Err(ExtractionError::JobFailed {
                        invocation_arn: handle.to_string(),
                        reason,
                    });
                }
                JobStatus::Pending => {}
            }

            let elapsed = started.elapsed();
            if status_checks >= self.config.max_attempts
                || elapsed.saturating_add(self.config.interval) > self.config.timeout
            {
                warn!(invocation_arn = %handle, status_checks, ?elapsed, "Gave up waiting for job");
                return Err(ExtractionError::Timeout {
                    invocation_arn: handle.to_string(),
                    attempts: status_checks,
                    elapsed,
                });
            }

            sleep(self.config.interval).await;
        }
    }
}

/// Follow the job metadata document to the first segment's custom output.
///
/// An empty or absent segment list is `OutputPathMissing`, not a retry.
pub async fn resolve_output<S: ObjectStore>(
    gateway: &ObjectStoreGateway<S>,
    metadata_location: &StorageLocation,
) -> Result<StorageLocation> {
    let metadata: JobMetadata = gateway.fetch_json(metadata_location).await?;

    let path = metadata
        .first_custom_output_path()
        .ok_or_else(|| ExtractionError::OutputPathMissing {
            location: metadata_location.to_string(),
        })?;

    StorageLocation::parse(path)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::stores::MemoryObjectStore;
    use crate::testing::MockDataAutomation;
    use crate::types::config::UploadConfig;

    fn fast() -> PollConfig {
        PollConfig::new().with_interval(Duration::ZERO)
    }

    fn metadata_location() -> StorageLocation {
        StorageLocation::new("b", "input_data/slip.pdf/output/job_metadata.json").unwrap()
    }

    #[tokio::test]
    async fn test_wait_counts_status_checks() {
        let mock = MockDataAutomation::new().with_statuses(vec![
            JobStatus::Pending,
            JobStatus::Pending,
            JobStatus::Success {
                metadata: metadata_location(),
            },
        ]);
        let poller = JobPoller::new(mock.clone(), fast());

        let completed = poller.wait(&JobHandle::new("arn:job")).await.unwrap();

        assert_eq!(completed.status_checks, 3);
        assert_eq!(completed.metadata, metadata_location());
        assert_eq!(mock.status_check_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_ends_wait() {
        let mock = MockDataAutomation::new().with_statuses(vec![
            JobStatus::Pending,
            JobStatus::Failure {
                reason: "ClientError: unsupported document".into(),
            },
            JobStatus::Pending,
        ]);
        let poller = JobPoller::new(mock.clone(), fast());

        let err = poller.wait(&JobHandle::new("arn:job")).await.unwrap_err();

        assert!(matches!(err, ExtractionError::JobFailed { .. }));
        assert_eq!(mock.status_check_count(), 2);
    }

    #[tokio::test]
    async fn test_attempt_cap_is_timeout() {
        let mock = MockDataAutomation::new().with_statuses(vec![JobStatus::Pending]);
        let poller = JobPoller::new(mock.clone(), fast().with_max_attempts(4));

        let err = poller.wait(&JobHandle::new("arn:job")).await.unwrap_err();

        assert!(matches!(err, ExtractionError::Timeout { attempts: 4, .. }));
        assert_eq!(mock.status_check_count(), 4);
    }

    #[tokio::test]
    async fn test_deadline_is_timeout() {
        let mock = MockDataAutomation::new().with_statuses(vec![JobStatus::Pending]);
        let config = PollConfig::new()
            .with_interval(Duration::from_millis(20))
            .with_timeout(Duration::from_millis(50));
        let poller = JobPoller::new(mock, config);

        let err = poller.wait(&JobHandle::new("arn:job")).await.unwrap_err();

        match err {
            ExtractionError::Timeout { attempts, .. } => assert!(attempts < 120),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_huge_interval_times_out_without_sleeping() {
        let mock = MockDataAutomation::new().with_statuses(vec![JobStatus::Pending]);
        let config = PollConfig::new()
            .with_interval(Duration::from_secs(u64::MAX))
            .with_timeout(Duration::from_secs(600));
        let poller = JobPoller::new(mock.clone(), config);

        let err = poller.wait(&JobHandle::new("arn:job")).await.unwrap_err();

        assert!(matches!(err, ExtractionError::Timeout { attempts: 1, .. }));
        assert_eq!(mock.status_check_count(), 1);
    }

    #[tokio::test]
    async fn test_status_check_error_is_not_retried() {
        let mock = MockDataAutomation::new().fail_status();
        let poller = JobPoller::new(mock.clone(), fast());

        let err = poller.wait(&JobHandle::new("arn:job")).await.unwrap_err();

        assert!(matches!(err, ExtractionError::StatusCheckFailed { .. }));
        assert_eq!(mock.status_check_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_output_follows_first_segment() {
        let store = MemoryObjectStore::new();
        store.insert_json(
            metadata_location(),
            &serde_json::json!({
                "output_metadata": [{
                    "segment_metadata": [{ "custom_output_path": "s3://b/out/custom_output/0/result.json" }]
                }]
            }),
        );
        let gateway = ObjectStoreGateway::new(store, UploadConfig::new("b"));

        let output = resolve_output(&gateway, &metadata_location()).await.unwrap();
        assert_eq!(output.key(), "out/custom_output/0/result.json");
    }

    #[tokio::test]
    async fn test_resolve_output_with_empty_segments() {
        let store = MemoryObjectStore::new();
        store.insert_json(
            metadata_location(),
            &serde_json::json!({ "output_metadata": [{ "segment_metadata": [] }] }),
        );
        let gateway = ObjectStoreGateway::new(store, UploadConfig::new("b"));

        let err = resolve_output(&gateway, &metadata_location()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::OutputPathMissing { .. }));
    }

    #[tokio::test]
    async fn test_resolve_output_with_null_lists() {
        for doc in [
            serde_json::json!({ "output_metadata": null }),
            serde_json::json!({ "output_metadata": [{ "segment_metadata": null }] }),
        ] {
            let store = MemoryObjectStore::new();
            store.insert_json(metadata_location(), &doc);
            let gateway = ObjectStoreGateway::new(store, UploadConfig::new("b"));

            let err = resolve_output(&gateway, &metadata_location()).await.unwrap_err();
            assert!(
                matches!(err, ExtractionError::OutputPathMissing { .. }),
                "{doc}: {err:?}"
            );
        }
    }
}
