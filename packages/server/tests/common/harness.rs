//! Test harness: the real router over the extraction library's mocks.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use extraction::testing::{MockDataAutomation, MockObjectStore, TestScenario};
use extraction::{PollConfig, UploadConfig};
use server_core::domains::documents::DocumentType;
use server_core::kernel::ServerDeps;
use server_core::server::{build_app, RequestLimits};
use tower::ServiceExt;

pub const BUCKET: &str = "test-bucket";
const BOUNDARY: &str = "extraction-test-boundary";

/// Router plus handles on the mocks behind it.
pub struct TestHarness {
    pub app: Router,
    pub store: MockObjectStore,
    pub automation: MockDataAutomation,
    pub scenario: TestScenario,
}

impl TestHarness {
    /// A harness with the Payslip project configured.
    pub fn new(scenario: TestScenario) -> Self {
        Self::build(scenario, true)
    }

    /// A harness with no project configured for any document type.
    pub fn without_project(scenario: TestScenario) -> Self {
        Self::build(scenario, false)
    }

    fn build(scenario: TestScenario, with_project: bool) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let (store, automation) = scenario.build();

        let mut deps = ServerDeps::new(
            Arc::new(store.clone()),
            Arc::new(automation.clone()),
            UploadConfig::new(BUCKET),
            PollConfig::new().with_interval(Duration::ZERO),
        );
        if with_project {
            deps = deps.with_project(DocumentType::Payslip, scenario.project().arn);
        }

        let app = build_app(deps, RequestLimits::default()).expect("router builds");

        Self {
            app,
            store,
            automation,
            scenario,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Submit the upload form.
    pub async fn upload(
        &self,
        document_type: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> (StatusCode, String) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document_type\"\r\n\r\n{document_type}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/extract")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}
