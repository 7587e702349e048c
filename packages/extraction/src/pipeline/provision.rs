//! Schema provisioner - idempotent blueprint and project creation.
//!
//! Both resources follow the same check-then-create pattern:
//! 1. Page through the listing until a resource with the name is found
//! 2. If none exists, create it
//! 3. If the create call reports "already exists" (a concurrent run won the
//!    race), list again and adopt the existing resource
//!
//! A failed listing is an error, never a silent "absent".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, ResourceKind, Result, ServiceError};
use crate::traits::automation::{DataAutomationControl, ResourceSummary};
use crate::types::{
    blueprint::{BlueprintRef, BlueprintSpec},
    project::{ProjectRef, ProjectSpec},
};

/// Result of a full provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provisioned {
    pub blueprint: BlueprintRef,
    pub project: ProjectRef,
    pub blueprint_created: bool,
    pub project_created: bool,
}

/// Ensures blueprints and projects exist in the data automation service.
pub struct Provisioner<C: DataAutomationControl> {
    control: C,
}

impl<C: DataAutomationControl> Provisioner<C> {
    pub fn new(control: C) -> Self {
        Self { control }
    }

    /// Ensure the blueprint, then a project bound to it.
    pub async fn provision(&self, blueprint: &BlueprintSpec, project_name: &str) -> Result<Provisioned> {
        let (blueprint, blueprint_created) = self.ensure_blueprint_tracked(blueprint).await?;
        let (project, project_created) = self
            .ensure_project_tracked(&ProjectSpec::new(project_name, blueprint.clone()))
            .await?;

        info!(
            blueprint_arn = %blueprint.arn,
            project_arn = %project.arn,
            blueprint_created,
            project_created,
            "Provisioning complete"
        );

        Ok(Provisioned {
            blueprint,
            project,
            blueprint_created,
            project_created,
        })
    }

    /// Return the blueprint named `spec.name`, creating it if absent.
    pub async fn ensure_blueprint(&self, spec: &BlueprintSpec) -> Result<BlueprintRef> {
        Ok(self.ensure_blueprint_tracked(spec).await?.0)
    }

    /// Return the project named `name`, creating it bound to `blueprint` if absent.
    pub async fn ensure_project(&self, name: &str, blueprint: &BlueprintRef) -> Result<ProjectRef> {
        let spec = ProjectSpec::new(name, blueprint.clone());
        Ok(self.ensure_project_tracked(&spec).await?.0)
    }

    /// Look up a blueprint by name.
    pub async fn find_blueprint(&self, name: &str) -> Result<Option<BlueprintRef>> {
        Ok(self
            .find(ResourceKind::Blueprint, name)
            .await?
            .map(|found| BlueprintRef::new(found.name, found.arn)))
    }

    /// Look up a project by name.
    pub async fn find_project(&self, name: &str) -> Result<Option<ProjectRef>> {
        Ok(self
            .find(ResourceKind::Project, name)
            .await?
            .map(|found| ProjectRef::new(found.name, found.arn)))
    }

    async fn ensure_blueprint_tracked(&self, spec: &BlueprintSpec) -> Result<(BlueprintRef, bool)> {
        if let Some(existing) = self.find_blueprint(&spec.name).await? {
            debug!(name = %spec.name, arn = %existing.arn, "Blueprint already exists");
            return Ok((existing, false));
        }

        info!(name = %spec.name, fields = spec.fields.len(), "Creating blueprint");
        match self.control.create_blueprint(spec).await {
            Ok(created) => Ok((created, true)),
            Err(source) => {
                let existing = self
                    .reconcile(ResourceKind::Blueprint, &spec.name, source)
                    .await?;
                Ok((BlueprintRef::new(existing.name, existing.arn), false))
            }
        }
    }

    async fn ensure_project_tracked(&self, spec: &ProjectSpec) -> Result<(ProjectRef, bool)> {
        if let Some(existing) = self.find_project(&spec.name).await? {
            debug!(name = %spec.name, arn = %existing.arn, "Project already exists");
            return Ok((existing, false));
        }

        info!(name = %spec.name, blueprints = spec.blueprints.len(), "Creating project");
        match self.control.create_project(spec).await {
            Ok(created) => Ok((created, true)),
            Err(source) => {
                let existing = self
                    .reconcile(ResourceKind::Project, &spec.name, source)
                    .await?;
                Ok((ProjectRef::new(existing.name, existing.arn), false))
            }
        }
    }

    /// After a failed create: adopt the existing resource on a conflict,
    /// otherwise surface the failure.
    async fn reconcile(
        &self,
        resource: ResourceKind,
        name: &str,
        source: ServiceError,
    ) -> Result<ResourceSummary> {
        if source.is_already_exists() {
            warn!(%resource, name, "Create conflicted with an existing resource, reconciling");
            if let Some(existing) = self.find(resource, name).await? {
                return Ok(existing);
            }
        }

        Err(ExtractionError::ProvisioningFailed {
            resource,
            name: name.to_string(),
            source,
        })
    }

    /// Page through the listing until `name` is found or the listing ends.
    async fn find(&self, resource: ResourceKind, name: &str) -> Result<Option<ResourceSummary>> {
        let check_failed = |source: ServiceError| ExtractionError::ProvisioningCheckFailed {
            resource,
            name: name.to_string(),
            source,
        };

        let mut next_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = match resource {
                ResourceKind::Blueprint => self.control.list_blueprints(next_token.as_deref()).await,
                ResourceKind::Project => self.control.list_projects(next_token.as_deref()).await,
            }
            .map_err(&check_failed)?;

            if let Some(found) = page.items.into_iter().find(|item| item.name == name) {
                return Ok(Some(found));
            }

            match page.next_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(check_failed(ServiceError::other(format!(
                            "listing returned a repeated continuation token: {token}"
                        ))));
                    }
                    next_token = Some(token);
                }
                _ => return Ok(None),
            }
        }
    }
}
