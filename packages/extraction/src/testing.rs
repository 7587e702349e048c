//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without making real storage or data automation calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ServiceError, ServiceResult};
use crate::stores::memory::{MemoryObjectStore, StoredObject};
use crate::traits::{
    automation::{DataAutomationControl, DataAutomationRuntime, Page, ResourceSummary},
    store::ObjectStore,
};
use crate::types::{
    blueprint::{BlueprintRef, BlueprintSpec},
    job::{InvocationRequest, JobHandle, JobStatus},
    location::StorageLocation,
    project::{ProjectRef, ProjectSpec},
};

const MOCK_ARN_PREFIX: &str = "arn:aws:bedrock:us-west-2:123456789012";

// =============================================================================
// Object store
// =============================================================================

/// An in-memory object store with failure injection and read tracking.
///
/// Clones share state, so a test can keep a handle for assertions after
/// moving the store into a pipeline.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    inner: Arc<MemoryObjectStore>,
    fail_puts: bool,
    drop_writes: bool,
    /// Existence checks allowed to succeed before the rest fail.
    heads_before_failure: Option<usize>,
    heads: Arc<RwLock<usize>>,
    gets: Arc<RwLock<HashMap<StorageLocation, usize>>>,
}

impl MockObjectStore {
    /// Create a new, working mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail.
    pub fn fail_puts(mut self) -> Self {
        self.fail_puts = true;
        self
    }

    /// Accept writes but never store them (verification will fail).
    pub fn drop_writes(mut self) -> Self {
        self.drop_writes = true;
        self
    }

    /// Make every existence check fail.
    pub fn fail_heads(self) -> Self {
        self.fail_heads_after(0)
    }

    /// Let the first `n` existence checks through, then fail the rest.
    pub fn fail_heads_after(mut self, n: usize) -> Self {
        self.heads_before_failure = Some(n);
        self
    }

    /// Seed an object.
    pub fn insert(&self, location: StorageLocation, body: impl Into<Vec<u8>>, content_type: &str) {
        self.inner.insert(location, body, content_type);
    }

    /// Seed a JSON document.
    pub fn insert_json(&self, location: StorageLocation, value: &serde_json::Value) {
        self.inner.insert_json(location, value);
    }

    /// Get a stored object with its metadata.
    pub fn object(&self, location: &StorageLocation) -> Option<StoredObject> {
        self.inner.object(location)
    }

    /// How many times `location` was read.
    pub fn get_count(&self, location: &StorageLocation) -> usize {
        self.gets
            .read()
            .unwrap()
            .get(location)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        location: &StorageLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        if self.fail_puts {
            return Err(ServiceError::other("mock put_object failure"));
        }
        if self.drop_writes {
            return Ok(());
        }
        self.inner.put_object(location, body, content_type).await
    }

    async fn head_object(&self, location: &StorageLocation) -> ServiceResult<bool> {
        let made = {
            let mut heads = self.heads.write().unwrap();
            *heads += 1;
            *heads - 1
        };
        if self.heads_before_failure.is_some_and(|n| made >= n) {
            return Err(ServiceError::other("mock head_object failure"));
        }
        self.inner.head_object(location).await
    }

    async fn get_object(&self, location: &StorageLocation) -> ServiceResult<Vec<u8>> {
        *self
            .gets
            .write()
            .unwrap()
            .entry(location.clone())
            .or_default() += 1;
        self.inner.get_object(location).await
    }
}

// =============================================================================
// Data automation service
// =============================================================================

/// Record of a call made to the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockDataAutomationCall {
    ListBlueprints { next_token: Option<String> },
    CreateBlueprint { name: String },
    ListProjects { next_token: Option<String> },
    CreateProject { name: String },
    InvokeAsync {
        input: String,
        output: String,
        project_arn: String,
    },
    GetStatus { invocation_arn: String },
}

#[derive(Default)]
struct MockState {
    blueprints: Vec<(BlueprintSpec, BlueprintRef)>,
    projects: Vec<(ProjectSpec, ProjectRef)>,
    blueprint_pages: Option<Vec<Page<ResourceSummary>>>,
    project_pages: Option<Vec<Page<ResourceSummary>>>,
    statuses: Vec<JobStatus>,
    status_index: usize,
    invocations: usize,
    fail_listing: bool,
    fail_create: bool,
    fail_invoke: bool,
    fail_status: bool,
    conflict_on_create: Option<String>,
    calls: Vec<MockDataAutomationCall>,
}

/// A mock data automation service (control and runtime planes).
///
/// - Listings reflect what was created, unless scripted pages are given
/// - Job statuses are replayed in order; the last one repeats
/// - Every call is recorded for assertions
#[derive(Clone, Default)]
pub struct MockDataAutomation {
    state: Arc<RwLock<MockState>>,
}

impl MockDataAutomation {
    /// Create a new mock with no resources and a job that stays pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace blueprint listings with scripted pages.
    pub fn with_blueprint_pages(self, pages: Vec<Page<ResourceSummary>>) -> Self {
        self.state.write().unwrap().blueprint_pages = Some(pages);
        self
    }

    /// Replace project listings with scripted pages.
    pub fn with_project_pages(self, pages: Vec<Page<ResourceSummary>>) -> Self {
        self.state.write().unwrap().project_pages = Some(pages);
        self
    }

    /// Script the sequence of job statuses.
    pub fn with_statuses(self, statuses: Vec<JobStatus>) -> Self {
        self.state.write().unwrap().statuses = statuses;
        self
    }

    /// Make listing calls fail.
    pub fn fail_listing(self) -> Self {
        self.state.write().unwrap().fail_listing = true;
        self
    }

    /// Make create calls fail.
    pub fn fail_create(self) -> Self {
        self.state.write().unwrap().fail_create = true;
        self
    }

    /// Reject job submissions.
    pub fn fail_invoke(self) -> Self {
        self.state.write().unwrap().fail_invoke = true;
        self
    }

    /// Make status checks fail.
    pub fn fail_status(self) -> Self {
        self.state.write().unwrap().fail_status = true;
        self
    }

    /// Simulate a concurrent creator: the create call for `name` finds the
    /// resource already made and reports a conflict.
    pub fn conflict_on_create(self, name: impl Into<String>) -> Self {
        self.state.write().unwrap().conflict_on_create = Some(name.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockDataAutomationCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Blueprints that exist in the mock.
    pub fn blueprints(&self) -> Vec<BlueprintSpec> {
        let state = self.state.read().unwrap();
        state.blueprints.iter().map(|(spec, _)| spec.clone()).collect()
    }

    /// Projects that exist in the mock.
    pub fn projects(&self) -> Vec<ProjectSpec> {
        let state = self.state.read().unwrap();
        state.projects.iter().map(|(spec, _)| spec.clone()).collect()
    }

    pub fn create_blueprint_count(&self) -> usize {
        self.count(|c| matches!(c, MockDataAutomationCall::CreateBlueprint { .. }))
    }

    pub fn create_project_count(&self) -> usize {
        self.count(|c| matches!(c, MockDataAutomationCall::CreateProject { .. }))
    }

    pub fn status_check_count(&self) -> usize {
        self.count(|c| matches!(c, MockDataAutomationCall::GetStatus { .. }))
    }

    fn count(&self, predicate: impl Fn(&MockDataAutomationCall) -> bool) -> usize {
        self.state
            .read()
            .unwrap()
            .calls
            .iter()
            .filter(|c| predicate(c))
            .count()
    }

    fn record(&self, call: MockDataAutomationCall) {
        self.state.write().unwrap().calls.push(call);
    }

    fn blueprint_ref(name: &str) -> BlueprintRef {
        BlueprintRef::new(name, format!("{MOCK_ARN_PREFIX}:blueprint/{name}"))
    }

    fn project_ref(name: &str) -> ProjectRef {
        ProjectRef::new(
            name,
            format!("{MOCK_ARN_PREFIX}:data-automation-project/{name}"),
        )
    }
}

/// Page `token` of a scripted listing: the first page for no token, else
/// the page after the one that handed out `token`.
fn scripted_page(
    pages: &[Page<ResourceSummary>],
    token: Option<&str>,
) -> ServiceResult<Page<ResourceSummary>> {
    let index = match token {
        None => 0,
        Some(token) => pages
            .iter()
            .position(|p| p.next_token.as_deref() == Some(token))
            .map(|i| i + 1)
            .ok_or_else(|| ServiceError::other(format!("invalid continuation token: {token}")))?,
    };

    Ok(pages
        .get(index)
        .cloned()
        .unwrap_or_else(|| Page::last(Vec::new())))
}

#[async_trait]
impl DataAutomationControl for MockDataAutomation {
    async fn list_blueprints(
        &self,
        next_token: Option<&str>,
    ) -> ServiceResult<Page<ResourceSummary>> {
        self.record(MockDataAutomationCall::ListBlueprints {
            next_token: next_token.map(str::to_string),
        });

        let state = self.state.read().unwrap();
        if state.fail_listing {
            return Err(ServiceError::other("mock ListBlueprints failure"));
        }
        if let Some(pages) = &state.blueprint_pages {
            return scripted_page(pages, next_token);
        }

        Ok(Page::last(
            state
                .blueprints
                .iter()
                .map(|(_, r)| ResourceSummary::new(&r.name, &r.arn))
                .collect(),
        ))
    }

    async fn create_blueprint(&self, spec: &BlueprintSpec) -> ServiceResult<BlueprintRef> {
        self.record(MockDataAutomationCall::CreateBlueprint {
            name: spec.name.clone(),
        });

        let mut state = self.state.write().unwrap();
        if state.fail_create {
            return Err(ServiceError::other("mock CreateBlueprint failure"));
        }

        let created = Self::blueprint_ref(&spec.name);
        let exists = state.blueprints.iter().any(|(s, _)| s.name == spec.name);
        if state.conflict_on_create.as_deref() == Some(spec.name.as_str()) {
            if !exists {
                state.blueprints.push((spec.clone(), created));
            }
            return Err(ServiceError::AlreadyExists(spec.name.clone()));
        }
        if exists {
            return Err(ServiceError::AlreadyExists(spec.name.clone()));
        }

        state.blueprints.push((spec.clone(), created.clone()));
        Ok(created)
    }

    async fn list_projects(&self, next_token: Option<&str>) -> ServiceResult<Page<ResourceSummary>> {
        self.record(MockDataAutomationCall::ListProjects {
            next_token: next_token.map(str::to_string),
        });

        let state = self.state.read().unwrap();
        if state.fail_listing {
            return Err(ServiceError::other("mock ListDataAutomationProjects failure"));
        }
        if let Some(pages) = &state.project_pages {
            return scripted_page(pages, next_token);
        }

        Ok(Page::last(
            state
                .projects
                .iter()
                .map(|(_, r)| ResourceSummary::new(&r.name, &r.arn))
                .collect(),
        ))
    }

    async fn create_project(&self, spec: &ProjectSpec) -> ServiceResult<ProjectRef> {
        self.record(MockDataAutomationCall::CreateProject {
            name: spec.name.clone(),
        });

        let mut state = self.state.write().unwrap();
        if state.fail_create {
            return Err(ServiceError::other("mock CreateDataAutomationProject failure"));
        }

        let created = Self::project_ref(&spec.name);
        let exists = state.projects.iter().any(|(s, _)| s.name == spec.name);
        if state.conflict_on_create.as_deref() == Some(spec.name.as_str()) {
            if !exists {
                state.projects.push((spec.clone(), created));
            }
            return Err(ServiceError::AlreadyExists(spec.name.clone()));
        }
        if exists {
            return Err(ServiceError::AlreadyExists(spec.name.clone()));
        }

        state.projects.push((spec.clone(), created.clone()));
        Ok(created)
    }
}

#[async_trait]
impl DataAutomationRuntime for MockDataAutomation {
    async fn invoke_async(&self, request: &InvocationRequest) -> ServiceResult<JobHandle> {
        self.record(MockDataAutomationCall::InvokeAsync {
            input: request.input.to_string(),
            output: request.output.to_string(),
            project_arn: request.project.arn.clone(),
        });

        let mut state = self.state.write().unwrap();
        if state.fail_invoke {
            return Err(ServiceError::other(format!(
                "ValidationException: invalid data automation project ARN {}",
                request.project.arn
            )));
        }

        state.invocations += 1;
        Ok(JobHandle::new(format!(
            "{MOCK_ARN_PREFIX}:data-automation-invocation/job-{}",
            state.invocations
        )))
    }

    async fn get_status(&self, handle: &JobHandle) -> ServiceResult<JobStatus> {
        self.record(MockDataAutomationCall::GetStatus {
            invocation_arn: handle.to_string(),
        });

        let mut state = self.state.write().unwrap();
        if state.fail_status {
            return Err(ServiceError::other("mock GetDataAutomationStatus failure"));
        }

        let status = match state.statuses.get(state.status_index) {
            Some(status) => status.clone(),
            None => state.statuses.last().cloned().unwrap_or(JobStatus::Pending),
        };
        state.status_index += 1;
        Ok(status)
    }
}

// =============================================================================
// End-to-end scenario
// =============================================================================

/// Builder for a full pipeline run against mocks.
///
/// Seeds the job metadata and result documents where the pipeline will look
/// for them and scripts the job status sequence.
///
/// ```rust,ignore
/// let scenario = TestScenario::new("bucket", "payslip.pdf")
///     .pending(2)
///     .with_result(json!({ "inference_result": { "PayDate": "2024-01-31" } }));
/// let (store, runtime) = scenario.build();
/// ```
#[derive(Debug, Clone)]
pub struct TestScenario {
    bucket: String,
    document_name: String,
    pending: usize,
    fails: bool,
    segments: bool,
    result: serde_json::Value,
}

impl TestScenario {
    /// A job that succeeds on the first status check with an empty result.
    pub fn new(bucket: impl Into<String>, document_name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            document_name: document_name.into(),
            pending: 0,
            fails: false,
            segments: true,
            result: serde_json::json!({ "inference_result": {} }),
        }
    }

    /// Number of `Pending` statuses before the terminal one.
    pub fn pending(mut self, count: usize) -> Self {
        self.pending = count;
        self
    }

    /// End the job in failure instead of success.
    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }

    /// Write job metadata with an empty segment list.
    pub fn without_segments(mut self) -> Self {
        self.segments = false;
        self
    }

    /// Result document returned at the custom output path.
    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = result;
        self
    }

    pub fn project(&self) -> ProjectRef {
        MockDataAutomation::project_ref("test_project")
    }

    pub fn input_location(&self) -> StorageLocation {
        StorageLocation::new(&self.bucket, format!("input_data/{}", self.document_name))
            .expect("scenario bucket and document name must be non-empty")
    }

    pub fn metadata_location(&self) -> StorageLocation {
        self.input_location()
            .child("output")
            .child("0/job_metadata.json")
    }

    pub fn result_location(&self) -> StorageLocation {
        self.input_location()
            .child("output")
            .child("0/custom_output/0/result.json")
    }

    /// Build the seeded store and scripted service.
    pub fn build(&self) -> (MockObjectStore, MockDataAutomation) {
        let store = MockObjectStore::new();

        let segments = if self.segments {
            serde_json::json!([{ "custom_output_path": self.result_location().to_string() }])
        } else {
            serde_json::json!([])
        };
        store.insert_json(
            self.metadata_location(),
            &serde_json::json!({ "output_metadata": [{ "segment_metadata": segments }] }),
        );
        store.insert_json(self.result_location(), &self.result);

        let mut statuses = vec![JobStatus::Pending; self.pending];
        statuses.push(if self.fails {
            JobStatus::Failure {
                reason: "ClientError: mock job failure".to_string(),
            }
        } else {
            JobStatus::Success {
                metadata: self.metadata_location(),
            }
        });

        let runtime = MockDataAutomation::new().with_statuses(statuses);
        (store, runtime)
    }
}
