use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockdataautomation::types::{
    BlueprintItem, BlueprintStage, CustomOutputConfiguration, DataAutomationProjectStage,
    DocumentOutputAdditionalFileFormat, DocumentOutputFormat, DocumentOutputTextFormat,
    DocumentOutputTextFormatType, DocumentOverrideConfiguration, DocumentStandardOutputConfiguration,
    OverrideConfiguration, SplitterConfiguration, StandardOutputConfiguration, State, Type,
};
use aws_sdk_bedrockdataautomationruntime::types::{
    AutomationJobStatus, DataAutomationConfiguration, DataAutomationStage, InputConfiguration,
    OutputConfiguration,
};
use tracing::debug;

use super::sdk_error;
use crate::error::{ServiceError, ServiceResult};
use crate::traits::automation::{DataAutomationControl, DataAutomationRuntime, Page, ResourceSummary};
use crate::types::{
    blueprint::{BlueprintRef, BlueprintSpec},
    job::{InvocationRequest, JobHandle, JobStatus},
    location::StorageLocation,
    project::{OutputOptions, ProjectRef, ProjectSpec},
};

type ControlClient = aws_sdk_bedrockdataautomation::Client;
type RuntimeClient = aws_sdk_bedrockdataautomationruntime::Client;

/// Bedrock Data Automation, both control plane and runtime.
#[derive(Debug, Clone)]
pub struct BedrockDataAutomation {
    control: ControlClient,
    runtime: RuntimeClient,
    profile_arn: Option<String>,
}

impl BedrockDataAutomation {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            control: ControlClient::new(config),
            runtime: RuntimeClient::new(config),
            profile_arn: None,
        }
    }

    /// Data automation profile passed with every invocation.
    pub fn with_profile_arn(mut self, profile_arn: Option<String>) -> Self {
        self.profile_arn = profile_arn;
        self
    }
}

fn state(enabled: bool) -> State {
    if enabled {
        State::Enabled
    } else {
        State::Disabled
    }
}

fn standard_output(options: &OutputOptions) -> ServiceResult<StandardOutputConfiguration> {
    let text_types = if options.plain_text {
        vec![DocumentOutputTextFormatType::PlainText]
    } else {
        Vec::new()
    };

    let output_format = DocumentOutputFormat::builder()
        .text_format(
            DocumentOutputTextFormat::builder()
                .set_types(Some(text_types))
                .build(),
        )
        .additional_file_format(
            DocumentOutputAdditionalFileFormat::builder()
                .state(state(options.additional_file_format))
                .build()
                .map_err(sdk_error)?,
        )
        .build();

    Ok(StandardOutputConfiguration::builder()
        .document(
            DocumentStandardOutputConfiguration::builder()
                .output_format(output_format)
                .build(),
        )
        .build())
}

fn custom_output(spec: &ProjectSpec) -> ServiceResult<CustomOutputConfiguration> {
    let blueprints = spec
        .blueprints
        .iter()
        .map(|b| {
            BlueprintItem::builder()
                .blueprint_arn(&b.arn)
                .build()
                .map_err(sdk_error)
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(CustomOutputConfiguration::builder()
        .set_blueprints(Some(blueprints))
        .build())
}

fn override_configuration(options: &OutputOptions) -> OverrideConfiguration {
    OverrideConfiguration::builder()
        .document(
            DocumentOverrideConfiguration::builder()
                .splitter(
                    SplitterConfiguration::builder()
                        .state(state(options.document_splitting))
                        .build(),
                )
                .build(),
        )
        .build()
}

#[async_trait]
impl DataAutomationControl for BedrockDataAutomation {
    async fn list_blueprints(
        &self,
        next_token: Option<&str>,
    ) -> ServiceResult<Page<ResourceSummary>> {
        let output = self
            .control
            .list_blueprints()
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(sdk_error)?;

        let items = output
            .blueprints()
            .iter()
            .filter_map(|b| {
                b.blueprint_name()
                    .map(|name| ResourceSummary::new(name, b.blueprint_arn()))
            })
            .collect();

        Ok(Page::new(items, output.next_token().map(str::to_string)))
    }

    async fn create_blueprint(&self, spec: &BlueprintSpec) -> ServiceResult<BlueprintRef> {
        let output = self
            .control
            .create_blueprint()
            .blueprint_name(&spec.name)
            .r#type(Type::Document)
            .blueprint_stage(BlueprintStage::Live)
            .schema(spec.schema_string())
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_conflict_exception()) {
                    ServiceError::AlreadyExists(spec.name.clone())
                } else {
                    sdk_error(err)
                }
            })?;

        let arn = output
            .blueprint()
            .map(|b| b.blueprint_arn().to_string())
            .ok_or_else(|| ServiceError::other("CreateBlueprint response has no blueprint"))?;

        debug!(name = %spec.name, %arn, "Created blueprint");
        Ok(BlueprintRef::new(&spec.name, arn))
    }

    async fn list_projects(&self, next_token: Option<&str>) -> ServiceResult<Page<ResourceSummary>> {
        let output = self
            .control
            .list_data_automation_projects()
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(sdk_error)?;

        let items = output
            .projects()
            .iter()
            .filter_map(|p| {
                p.project_name()
                    .map(|name| ResourceSummary::new(name, p.project_arn()))
            })
            .collect();

        Ok(Page::new(items, output.next_token().map(str::to_string)))
    }

    async fn create_project(&self, spec: &ProjectSpec) -> ServiceResult<ProjectRef> {
        let output = self
            .control
            .create_data_automation_project()
            .project_name(&spec.name)
            .project_description(&spec.description)
            .project_stage(DataAutomationProjectStage::Live)
            .standard_output_configuration(standard_output(&spec.output)?)
            .custom_output_configuration(custom_output(spec)?)
            .override_configuration(override_configuration(&spec.output))
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_conflict_exception()) {
                    ServiceError::AlreadyExists(spec.name.clone())
                } else {
                    sdk_error(err)
                }
            })?;

        debug!(name = %spec.name, arn = output.project_arn(), "Created project");
        Ok(ProjectRef::new(&spec.name, output.project_arn()))
    }
}

#[async_trait]
impl DataAutomationRuntime for BedrockDataAutomation {
    async fn invoke_async(&self, request: &InvocationRequest) -> ServiceResult<JobHandle> {
        let input = InputConfiguration::builder()
            .s3_uri(request.input.to_uri())
            .build()
            .map_err(sdk_error)?;
        let output = OutputConfiguration::builder()
            .s3_uri(request.output.to_uri())
            .build()
            .map_err(sdk_error)?;
        let configuration = DataAutomationConfiguration::builder()
            .data_automation_project_arn(&request.project.arn)
            .stage(DataAutomationStage::Live)
            .build()
            .map_err(sdk_error)?;

        let response = self
            .runtime
            .invoke_data_automation_async()
            .input_configuration(input)
            .output_configuration(output)
            .data_automation_configuration(configuration)
            .set_data_automation_profile_arn(self.profile_arn.clone())
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(JobHandle::new(response.invocation_arn()))
    }

    async fn get_status(&self, handle: &JobHandle) -> ServiceResult<JobStatus> {
        let response = self
            .runtime
            .get_data_automation_status()
            .invocation_arn(handle.invocation_arn())
            .send()
            .await
            .map_err(sdk_error)?;

        let status = match response.status() {
            Some(AutomationJobStatus::Success) => {
                let uri = response
                    .output_configuration()
                    .map(|o| o.s3_uri())
                    .ok_or_else(|| ServiceError::other("successful job has no output location"))?;
                let metadata = StorageLocation::parse(uri)
                    .map_err(|e| ServiceError::Other(Box::new(e)))?;
                JobStatus::Success { metadata }
            }
            Some(AutomationJobStatus::ServiceError) | Some(AutomationJobStatus::ClientError) => {
                let kind = response
                    .error_type()
                    .or_else(|| response.status().map(|s| s.as_str()))
                    .unwrap_or("Error");
                let message = response.error_message().unwrap_or("no error message");
                JobStatus::Failure {
                    reason: format!("{kind}: {message}"),
                }
            }
            _ => JobStatus::Pending,
        };

        Ok(status)
    }
}
