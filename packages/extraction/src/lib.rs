//! Document Extraction Library
//!
//! Drives a managed document-understanding service: provisions a blueprint
//! (the field schema) and a project that uses it, uploads documents to object
//! storage, runs asynchronous extraction jobs and renders their results.
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::{ExtractionPipeline, Document, MediaType, PollConfig, UploadConfig};
//! use extraction::testing::{MockDataAutomation, MockObjectStore};
//!
//! let pipeline = ExtractionPipeline::new(
//!     MockObjectStore::new(),
//!     MockDataAutomation::new(),
//!     UploadConfig::new("my-bucket"),
//!     PollConfig::default(),
//! );
//!
//! let document = Document::new("payslip.pdf", MediaType::Pdf, bytes)?;
//! let outcome = pipeline.run(document, &project).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Service abstractions (ObjectStore, DataAutomationControl, DataAutomationRuntime)
//! - [`types`] - Locations, documents, blueprints, jobs and results
//! - [`pipeline`] - Provisioning and the per-document workflow
//! - [`stores`] - Storage implementations (MemoryObjectStore)
//! - [`aws`] - Amazon S3 and Bedrock Data Automation clients (`aws` feature)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "aws")]
pub mod aws;

// Re-export core types at crate root
pub use error::{ExtractionError, ResourceKind, Result, ServiceError, ServiceResult};
pub use pipeline::{
    render, resolve_output, CompletedJob, ExtractionOutcome, ExtractionPipeline, JobClient,
    JobPoller, ObjectStoreGateway, Provisioned, Provisioner, RequestContext, Stage,
};
pub use stores::MemoryObjectStore;
pub use traits::{
    automation::{DataAutomationControl, DataAutomationRuntime, Page, ResourceSummary},
    store::ObjectStore,
};
pub use types::{
    blueprint::{payslip_blueprint, BlueprintRef, BlueprintSpec, FieldSpec, FieldType, InferenceType},
    config::{PollConfig, UploadConfig},
    document::{Document, MediaType},
    job::{InvocationRequest, JobHandle, JobMetadata, JobStatus},
    location::StorageLocation,
    project::{OutputOptions, ProjectRef, ProjectSpec},
    result::{ExtractionResult, Rendering, ResultRow, ResultTable},
};
