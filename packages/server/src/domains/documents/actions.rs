//! Documents domain actions - business logic functions
//!
//! These actions provide the interface between the HTTP routes (and the
//! provision CLI) and the extraction library.

use anyhow::{Context, Result};
use extraction::{
    DataAutomationControl, Document, ExtractionOutcome, MediaType, Provisioned, Provisioner,
};
use serde::Serialize;
use tracing::info;

use super::DocumentType;
use crate::kernel::ServerDeps;

// =============================================================================
// Extraction
// =============================================================================

/// A file as received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Run one uploaded file through the extraction pipeline.
///
/// Every call starts from a fresh request context; nothing carries over
/// from earlier requests.
pub async fn extract_document(
    document_type: DocumentType,
    file: UploadedFile,
    deps: &ServerDeps,
) -> Result<ExtractionOutcome> {
    let project = deps.project_for(document_type).with_context(|| {
        format!(
            "No data automation project is configured for {document_type} documents (set {})",
            document_type.project_arn_var()
        )
    })?;

    let media_type = MediaType::resolve(file.content_type.as_deref(), &file.file_name)?;
    let document = Document::new(&file.file_name, media_type, file.bytes)?;

    info!(
        document_type = %document_type,
        document = %document.name(),
        media_type = %media_type,
        bytes = document.len(),
        "Extracting document"
    );

    let name = document.name().to_string();
    deps.pipeline
        .run(document, project)
        .await
        .with_context(|| format!("Extraction failed for {name}"))
}

// =============================================================================
// Provisioning
// =============================================================================

/// What the provision CLI prints.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub document_type: DocumentType,
    pub final_project_arn: String,
    #[serde(flatten)]
    pub provisioned: Provisioned,
}

/// Ensure the blueprint and project for `document_type` exist.
///
/// Safe to run repeatedly: existing resources are reused, never duplicated.
pub async fn provision_document_type<C: DataAutomationControl>(
    control: C,
    document_type: DocumentType,
    blueprint_name: &str,
    project_name: &str,
) -> Result<ProvisionReport> {
    let provisioned = Provisioner::new(control)
        .provision(&document_type.blueprint(blueprint_name), project_name)
        .await
        .with_context(|| format!("Failed to provision {document_type} resources"))?;

    Ok(ProvisionReport {
        document_type,
        final_project_arn: provisioned.project.arn.clone(),
        provisioned,
    })
}
