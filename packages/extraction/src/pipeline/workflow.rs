//! The extraction pipeline - main entry point for processing one document.
//!
//! ```text
//! Upload → Verify → Submit → Poll → Resolve output → Render
//! ```
//!
//! Each step's failure short-circuits the rest. The blueprint and project
//! are provisioned out of band (see [`Provisioner`](crate::pipeline::Provisioner));
//! the pipeline only needs the project reference.

use tracing::{info, instrument};

use crate::error::{ExtractionError, Result};
use crate::pipeline::context::RequestContext;
use crate::pipeline::poll::{resolve_output, JobPoller};
use crate::pipeline::render::render_location;
use crate::pipeline::submit::JobClient;
use crate::pipeline::upload::ObjectStoreGateway;
use crate::traits::{automation::DataAutomationRuntime, store::ObjectStore};
use crate::types::{
    config::{PollConfig, UploadConfig},
    document::Document,
    job::JobStatus,
    project::ProjectRef,
    result::Rendering,
};

/// A finished request: its context and what to display.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub context: RequestContext,
    pub rendering: Rendering,
}

/// Runs documents through upload, extraction and rendering.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = ExtractionPipeline::new(store, runtime, UploadConfig::new("bucket"), PollConfig::default());
/// let outcome = pipeline.run(document, &project).await?;
/// if let Some(table) = outcome.rendering.table() {
///     for row in &table.rows {
///         println!("{} {} {}", row.index, row.field, row.value);
///     }
/// }
/// ```
pub struct ExtractionPipeline<S: ObjectStore, R: DataAutomationRuntime + Clone> {
    gateway: ObjectStoreGateway<S>,
    jobs: JobClient<R>,
    poller: JobPoller<R>,
}

impl<S: ObjectStore, R: DataAutomationRuntime + Clone> ExtractionPipeline<S, R> {
    pub fn new(store: S, runtime: R, upload: UploadConfig, poll: PollConfig) -> Self {
        Self {
            gateway: ObjectStoreGateway::new(store, upload),
            jobs: JobClient::new(runtime.clone()),
            poller: JobPoller::new(runtime, poll),
        }
    }

    /// Process one document with a fresh context.
    pub async fn run(&self, document: Document, project: &ProjectRef) -> Result<ExtractionOutcome> {
        let mut context = RequestContext::new(&document, project.clone());
        let rendering = self.run_with_context(&mut context, &document).await?;
        Ok(ExtractionOutcome { context, rendering })
    }

    /// Process one document, recording progress in `context`.
    ///
    /// On error the context shows how far the request got.
    #[instrument(skip_all, fields(request_id = %context.id, document = %context.document_name))]
    pub async fn run_with_context(
        &self,
        context: &mut RequestContext,
        document: &Document,
    ) -> Result<Rendering> {
        let input = self.gateway.upload(document).await?;
        let output = self.gateway.output_location(&input);
        context.uploaded(input.clone(), output.clone());

        if !self.gateway.exists(&input).await? {
            return Err(ExtractionError::VerificationFailed {
                location: input.to_string(),
                source: None,
            });
        }

        let job = self.jobs.submit(&input, &output, &context.project).await?;
        context.submitted(job.clone());

        let completed = match self.poller.wait(&job).await {
            Ok(completed) => completed,
            Err(e) => {
                if let ExtractionError::JobFailed { reason, .. } = &e {
                    context.status = Some(JobStatus::Failure {
                        reason: reason.clone(),
                    });
                }
                return Err(e);
            }
        };
        context.completed(
            JobStatus::Success {
                metadata: completed.metadata.clone(),
            },
            completed.status_checks,
        );

        let result = resolve_output(&self.gateway, &completed.metadata).await?;
        let rendering = render_location(&self.gateway, &result).await?;
        context.rendered(result);

        info!(
            invocation_arn = %job,
            status_checks = completed.status_checks,
            rows = rendering.table().map_or(0, |t| t.len()),
            "Extraction complete"
        );

        Ok(rendering)
    }
}
