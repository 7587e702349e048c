//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Provisioning (idempotent blueprint and project setup)
//! - Upload with read-back verification
//! - Job submission and status polling
//! - Output resolution from job metadata
//! - Rendering the result into a display table

pub mod context;
pub mod poll;
pub mod provision;
pub mod render;
pub mod submit;
pub mod upload;
pub mod workflow;

pub use context::{RequestContext, Stage};
pub use poll::{resolve_output, CompletedJob, JobPoller};
pub use provision::{Provisioned, Provisioner};
pub use render::{render, render_location};
pub use submit::JobClient;
pub use upload::ObjectStoreGateway;
pub use workflow::{ExtractionOutcome, ExtractionPipeline};
