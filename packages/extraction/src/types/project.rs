//! Project types - a named binding of blueprints and output options.

use serde::{Deserialize, Serialize};

use super::blueprint::BlueprintRef;

/// Output formatting options attached to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Emit the document's plain text in the standard output
    pub plain_text: bool,

    /// Emit the additional file format alongside the JSON output
    pub additional_file_format: bool,

    /// Split multi-document files into segments before matching blueprints
    pub document_splitting: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            plain_text: true,
            additional_file_format: true,
            document_splitting: true,
        }
    }
}

/// Definition of a project to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub name: String,
    pub description: String,
    pub blueprints: Vec<BlueprintRef>,
    pub output: OutputOptions,
}

impl ProjectSpec {
    /// Project bound to a single blueprint, described by its own name.
    pub fn new(name: impl Into<String>, blueprint: BlueprintRef) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            blueprints: vec![blueprint],
            output: OutputOptions::default(),
        }
    }
}

/// Reference to a project that exists in the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
    pub arn: String,
}

impl ProjectRef {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}
