//! Data automation service traits.
//!
//! The service is split the way the cloud API is:
//! - `DataAutomationControl`: blueprint and project management (build time)
//! - `DataAutomationRuntime`: async job invocation and status (request time)

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::types::{
    blueprint::{BlueprintRef, BlueprintSpec},
    job::{InvocationRequest, JobHandle, JobStatus},
    project::{ProjectRef, ProjectSpec},
};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A final page (no continuation token).
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// Name and ARN of a listed resource (blueprint or project).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary {
    pub name: String,
    pub arn: String,
}

impl ResourceSummary {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// Blueprint and project management.
#[async_trait]
pub trait DataAutomationControl: Send + Sync {
    /// List blueprints, starting after `next_token` when given.
    async fn list_blueprints(&self, next_token: Option<&str>)
        -> ServiceResult<Page<ResourceSummary>>;

    /// Create a blueprint in the live stage.
    ///
    /// Returns [`ServiceError::AlreadyExists`](crate::error::ServiceError::AlreadyExists)
    /// when the name is taken.
    async fn create_blueprint(&self, spec: &BlueprintSpec) -> ServiceResult<BlueprintRef>;

    /// List projects, starting after `next_token` when given.
    async fn list_projects(&self, next_token: Option<&str>) -> ServiceResult<Page<ResourceSummary>>;

    /// Create a project in the live stage.
    async fn create_project(&self, spec: &ProjectSpec) -> ServiceResult<ProjectRef>;
}

/// Async job invocation and status.
#[async_trait]
pub trait DataAutomationRuntime: Send + Sync {
    /// Start an extraction job.
    async fn invoke_async(&self, request: &InvocationRequest) -> ServiceResult<JobHandle>;

    /// Current status of a job.
    async fn get_status(&self, handle: &JobHandle) -> ServiceResult<JobStatus>;
}

#[async_trait]
impl<T: DataAutomationControl + ?Sized> DataAutomationControl for Arc<T> {
    async fn list_blueprints(
        &self,
        next_token: Option<&str>,
    ) -> ServiceResult<Page<ResourceSummary>> {
        (**self).list_blueprints(next_token).await
    }

    async fn create_blueprint(&self, spec: &BlueprintSpec) -> ServiceResult<BlueprintRef> {
        (**self).create_blueprint(spec).await
    }

    async fn list_projects(&self, next_token: Option<&str>) -> ServiceResult<Page<ResourceSummary>> {
        (**self).list_projects(next_token).await
    }

    async fn create_project(&self, spec: &ProjectSpec) -> ServiceResult<ProjectRef> {
        (**self).create_project(spec).await
    }
}

#[async_trait]
impl<T: DataAutomationRuntime + ?Sized> DataAutomationRuntime for Arc<T> {
    async fn invoke_async(&self, request: &InvocationRequest) -> ServiceResult<JobHandle> {
        (**self).invoke_async(request).await
    }

    async fn get_status(&self, handle: &JobHandle) -> ServiceResult<JobStatus> {
        (**self).get_status(handle).await
    }
}
