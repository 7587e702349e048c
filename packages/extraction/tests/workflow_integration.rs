//! Integration tests for the full workflow through the public API:
//! provision, then upload, submit, poll, resolve and render.

use std::sync::Arc;
use std::time::Duration;

use extraction::testing::{MockDataAutomation, MockDataAutomationCall, TestScenario};
use extraction::{
    payslip_blueprint, DataAutomationRuntime, Document, ExtractionError, ExtractionPipeline,
    MediaType, ObjectStore, PollConfig, Provisioner, Rendering, Stage, UploadConfig,
};
use serde_json::json;

fn fast_polling() -> PollConfig {
    PollConfig::new().with_interval(Duration::ZERO)
}

#[tokio::test]
async fn test_provisioned_project_is_used_for_extraction() {
    let control = MockDataAutomation::new();
    let provisioned = Provisioner::new(control.clone())
        .provision(&payslip_blueprint("custom_payslip"), "custom_payslip_project")
        .await
        .unwrap();

    let scenario = TestScenario::new("docs", "payslip.pdf")
        .pending(1)
        .with_result(json!({
            "inference_result": { "NetPay": 3120.75, "PayDate": "2024-01-31", "CityTaxes": "" }
        }));
    let (store, runtime) = scenario.build();
    let pipeline = ExtractionPipeline::new(
        store,
        runtime.clone(),
        UploadConfig::new("docs"),
        fast_polling(),
    );

    let document = Document::new("payslip.pdf", MediaType::Pdf, b"%PDF-1.7".to_vec()).unwrap();
    let outcome = pipeline.run(document, &provisioned.project).await.unwrap();

    let table = outcome.rendering.table().unwrap();
    assert_eq!(table.fields().collect::<Vec<_>>(), vec!["NetPay", "PayDate"]);
    assert_eq!(table.get("NetPay"), Some("3120.75"));
    assert_eq!(outcome.context.stage, Stage::Rendered);

    let invocation = runtime
        .calls()
        .into_iter()
        .find(|c| matches!(c, MockDataAutomationCall::InvokeAsync { .. }))
        .unwrap();
    assert_eq!(
        invocation,
        MockDataAutomationCall::InvokeAsync {
            input: "s3://docs/input_data/payslip.pdf".into(),
            output: "s3://docs/input_data/payslip.pdf/output".into(),
            project_arn: provisioned.project.arn.clone(),
        }
    );
}

#[tokio::test]
async fn test_pipeline_over_trait_objects() {
    let scenario = TestScenario::new("docs", "slip.png")
        .with_result(json!({ "inference_result": { "EmployeeName": "Jane Doe" } }));
    let (store, runtime) = scenario.build();

    let store: Arc<dyn ObjectStore> = Arc::new(store);
    let runtime: Arc<dyn DataAutomationRuntime> = Arc::new(runtime);
    let pipeline = ExtractionPipeline::new(store, runtime, UploadConfig::new("docs"), fast_polling());

    let document = Document::new("slip.png", MediaType::Png, vec![0x89, b'P', b'N', b'G']).unwrap();
    let outcome = pipeline.run(document, &scenario.project()).await.unwrap();

    assert_eq!(
        outcome.rendering.table().unwrap().get("EmployeeName"),
        Some("Jane Doe")
    );
}

#[tokio::test]
async fn test_file_name_with_spaces_round_trips() {
    let scenario = TestScenario::new("docs", "march payslip.pdf")
        .with_result(json!({ "inference_result": { "PayDate": "2024-03-31" } }));
    let (store, runtime) = scenario.build();
    let pipeline = ExtractionPipeline::new(
        store.clone(),
        runtime,
        UploadConfig::new("docs"),
        fast_polling(),
    );

    let document =
        Document::new("march payslip.pdf", MediaType::Pdf, b"%PDF-1.7".to_vec()).unwrap();
    let outcome = pipeline.run(document, &scenario.project()).await.unwrap();

    assert_eq!(
        outcome.context.input.as_ref().map(|l| l.key()),
        Some("input_data/march payslip.pdf")
    );
    assert_eq!(store.object(&scenario.input_location()).unwrap().body, b"%PDF-1.7");
}

#[tokio::test]
async fn test_attempt_cap_ends_request_with_timeout() {
    let scenario = TestScenario::new("docs", "payslip.pdf").pending(10);
    let (store, runtime) = scenario.build();
    let pipeline = ExtractionPipeline::new(
        store.clone(),
        runtime.clone(),
        UploadConfig::new("docs"),
        fast_polling().with_max_attempts(3),
    );

    let document = Document::new("payslip.pdf", MediaType::Pdf, b"%PDF-1.7".to_vec()).unwrap();
    let err = pipeline.run(document, &scenario.project()).await.unwrap_err();

    assert!(matches!(err, ExtractionError::Timeout { attempts: 3, .. }));
    assert_eq!(runtime.status_check_count(), 3);
    assert_eq!(store.get_count(&scenario.result_location()), 0);
}

#[tokio::test]
async fn test_concurrent_provisioning_reconciles() {
    // Another run creates the project between our listing and our create call
    let control = MockDataAutomation::new().conflict_on_create("custom_payslip_project");

    let provisioned = Provisioner::new(control.clone())
        .provision(&payslip_blueprint("custom_payslip"), "custom_payslip_project")
        .await
        .unwrap();

    assert!(provisioned.blueprint_created);
    assert!(!provisioned.project_created);
    assert_eq!(control.projects().len(), 1);
    assert_eq!(provisioned.project.name, "custom_payslip_project");
}

#[tokio::test]
async fn test_no_valid_results_is_not_an_error() {
    let scenario = TestScenario::new("docs", "payslip.pdf")
        .with_result(json!({ "inference_result": {} }));
    let (store, runtime) = scenario.build();
    let pipeline = ExtractionPipeline::new(store, runtime, UploadConfig::new("docs"), fast_polling());

    let document = Document::new("payslip.pdf", MediaType::Pdf, b"%PDF-1.7".to_vec()).unwrap();
    let outcome = pipeline.run(document, &scenario.project()).await.unwrap();

    assert_eq!(outcome.rendering, Rendering::NoValidResults);
}
