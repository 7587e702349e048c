//! Server dependencies (using traits for testability)
//!
//! Handlers only see the trait objects, so tests swap in the extraction
//! library's mocks and production wires S3 and Bedrock Data Automation.

use std::collections::HashMap;
use std::sync::Arc;

use extraction::aws::SdkConfig;
use extraction::aws::{BedrockDataAutomation, S3ObjectStore};
use extraction::{
    DataAutomationRuntime, ExtractionPipeline, ObjectStore, PollConfig, ProjectRef, UploadConfig,
};

use crate::config::Config;
use crate::domains::documents::DocumentType;

/// The pipeline as the server runs it, over trait objects.
pub type Pipeline = ExtractionPipeline<Arc<dyn ObjectStore>, Arc<dyn DataAutomationRuntime>>;

/// Dependencies shared (immutably) by every request.
#[derive(Clone)]
pub struct ServerDeps {
    pub pipeline: Arc<Pipeline>,
    projects: HashMap<DocumentType, ProjectRef>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        runtime: Arc<dyn DataAutomationRuntime>,
        upload: UploadConfig,
        poll: PollConfig,
    ) -> Self {
        Self {
            pipeline: Arc::new(ExtractionPipeline::new(store, runtime, upload, poll)),
            projects: HashMap::new(),
        }
    }

    /// Production wiring from configuration and loaded AWS settings.
    pub fn from_config(config: &Config, sdk: &SdkConfig) -> Self {
        let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(sdk));
        let runtime: Arc<dyn DataAutomationRuntime> = Arc::new(
            BedrockDataAutomation::new(sdk)
                .with_profile_arn(config.data_automation_profile_arn.clone()),
        );

        let mut deps = Self::new(store, runtime, config.upload_config(), config.poll_config());
        for document_type in DocumentType::ALL {
            match config.project_arn(document_type) {
                Some(arn) => deps = deps.with_project(document_type, arn),
                None => tracing::warn!(
                    document_type = %document_type,
                    variable = document_type.project_arn_var(),
                    "No data automation project configured"
                ),
            }
        }
        deps
    }

    /// Bind a document type to an existing project.
    pub fn with_project(mut self, document_type: DocumentType, arn: impl Into<String>) -> Self {
        self.projects.insert(
            document_type,
            ProjectRef::new(document_type.project_name(), arn),
        );
        self
    }

    pub fn project_for(&self, document_type: DocumentType) -> Option<&ProjectRef> {
        self.projects.get(&document_type)
    }
}
