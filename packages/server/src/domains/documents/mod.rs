//! Documents domain - document types and the extraction actions behind the page.

pub mod actions;
pub mod preview;

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use extraction::{payslip_blueprint, BlueprintSpec};
use serde::Serialize;

/// Kinds of document the service knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    Payslip,
}

impl DocumentType {
    /// All types, in selector order.
    pub const ALL: [DocumentType; 1] = [DocumentType::Payslip];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Payslip => "Payslip",
        }
    }

    /// Environment variable holding this type's project ARN.
    pub fn project_arn_var(&self) -> &'static str {
        match self {
            Self::Payslip => "PAYSLIP_DATA_AUTOMATION_ARN",
        }
    }

    pub fn blueprint_name(&self) -> &'static str {
        match self {
            Self::Payslip => "custom_payslip",
        }
    }

    pub fn project_name(&self) -> &'static str {
        match self {
            Self::Payslip => "custom_payslip_project",
        }
    }

    /// Blueprint definition for this type, under `name`.
    pub fn blueprint(&self, name: &str) -> BlueprintSpec {
        match self {
            Self::Payslip => payslip_blueprint(name),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        match Self::ALL.iter().find(|t| t.label().eq_ignore_ascii_case(s)) {
            Some(document_type) => Ok(*document_type),
            None => bail!("Unknown document type: {s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_type() {
        assert_eq!("Payslip".parse::<DocumentType>().unwrap(), DocumentType::Payslip);
        assert_eq!(" payslip ".parse::<DocumentType>().unwrap(), DocumentType::Payslip);
        assert!("invoice".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_payslip_blueprint_uses_given_name() {
        let spec = DocumentType::Payslip.blueprint("custom_payslip");
        assert_eq!(spec.name, "custom_payslip");
        assert!(!spec.fields.is_empty());
    }
}
