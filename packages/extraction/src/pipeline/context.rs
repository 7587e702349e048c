//! Per-request context carried through the pipeline.
//!
//! Every request builds a fresh context; nothing in it is shared with other
//! requests. Starting over (e.g. after the user picks another document
//! type) means building a new context, not clearing an old one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{
    document::{Document, MediaType},
    job::{JobHandle, JobStatus},
    location::StorageLocation,
    project::ProjectRef,
};

/// How far a request got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Created,
    Uploaded,
    Submitted,
    Completed,
    Rendered,
}

/// State of one extraction request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub document_name: String,
    pub media_type: MediaType,
    pub project: ProjectRef,
    pub stage: Stage,
    pub input: Option<StorageLocation>,
    pub output: Option<StorageLocation>,
    pub job: Option<JobHandle>,
    #[serde(serialize_with = "serialize_status")]
    pub status: Option<JobStatus>,
    pub status_checks: u32,
    pub result: Option<StorageLocation>,
}

impl RequestContext {
    pub fn new(document: &Document, project: ProjectRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            document_name: document.name().to_string(),
            media_type: document.media_type(),
            project,
            stage: Stage::Created,
            input: None,
            output: None,
            job: None,
            status: None,
            status_checks: 0,
            result: None,
        }
    }

    pub(crate) fn uploaded(&mut self, input: StorageLocation, output: StorageLocation) {
        self.input = Some(input);
        self.output = Some(output);
        self.stage = Stage::Uploaded;
    }

    pub(crate) fn submitted(&mut self, job: JobHandle) {
        self.job = Some(job);
        self.status = Some(JobStatus::Pending);
        self.stage = Stage::Submitted;
    }

    pub(crate) fn completed(&mut self, status: JobStatus, status_checks: u32) {
        self.status = Some(status);
        self.status_checks = status_checks;
        self.stage = Stage::Completed;
    }

    pub(crate) fn rendered(&mut self, result: StorageLocation) {
        self.result = Some(result);
        self.stage = Stage::Rendered;
    }
}

fn serialize_status<S: serde::Serializer>(
    status: &Option<JobStatus>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match status {
        Some(status) => serializer.serialize_some(status.label()),
        None => serializer.serialize_none(),
    }
}
