//! Blueprint types - the extraction schema registered with the service.
//!
//! A blueprint names the fields to extract from one document class. Each
//! field carries a value type, an inference type and a natural-language
//! description that the service uses as the extraction prompt.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Value type of an extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

/// How the service obtains a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceType {
    /// Read literal text from the document
    Extractive,
    /// Model-inferred answer
    Generative,
}

/// One field of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(rename = "inferenceType")]
    pub inference_type: InferenceType,
    /// Prompt sent to the service for this field
    pub description: String,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        inference_type: InferenceType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            inference_type,
            description: description.into(),
        }
    }

    pub fn extractive(name: impl Into<String>, field_type: FieldType, description: &str) -> Self {
        Self::new(name, field_type, InferenceType::Extractive, description)
    }

    pub fn generative(name: impl Into<String>, field_type: FieldType, description: &str) -> Self {
        Self::new(name, field_type, InferenceType::Generative, description)
    }
}

/// A named, document-type blueprint definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSpec {
    pub name: String,
    pub description: String,
    pub document_class: String,
    pub fields: Vec<FieldSpec>,
}

impl BlueprintSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "default".to_string(),
            document_class: "default".to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_document_class(mut self, document_class: impl Into<String>) -> Self {
        self.document_class = document_class.into();
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Render the JSON-schema (draft-07) document the service expects.
    ///
    /// A repeated field name keeps its last definition.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                json!({
                    "type": field.field_type,
                    "inferenceType": field.inference_type,
                    "description": field.description,
                }),
            );
        }

        json!({
            "$schema": JSON_SCHEMA_DRAFT_07,
            "description": self.description,
            "documentClass": self.document_class,
            "type": "object",
            "properties": properties,
        })
    }

    /// Schema serialized as the string payload of a create call.
    pub fn schema_string(&self) -> String {
        self.to_json_schema().to_string()
    }
}

/// Reference to a blueprint that exists in the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlueprintRef {
    pub name: String,
    pub arn: String,
}

impl BlueprintRef {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// Built-in payslip blueprint.
///
/// Covers pay period and pay date, employee and employer details, filing
/// statuses, current/YTD gross and net pay, rates, taxes and a few
/// consistency checks the model answers generatively.
pub fn payslip_blueprint(name: impl Into<String>) -> BlueprintSpec {
    use FieldType::{Boolean, Number, String as Text};

    BlueprintSpec::new(name).with_fields([
        FieldSpec::generative("PayPeriodStartDate", Text, "What is the Pay Period Start Date? YYYY-MM-DD Format"),
        FieldSpec::generative("PayPeriodEndDate", Text, "What is the Pay Period End Date? YYYY-MM-DD Format"),
        FieldSpec::generative("PayDate", Text, "What is the Pay Date? YYYY-MM-DD Format"),
        FieldSpec::generative("EmployeeName", Text, "Extract the employee name"),
        FieldSpec::generative("EmployeeAddress", Text, "Extract the employee address"),
        FieldSpec::generative("CompanyAddress", Text, "Extract the company address"),
        FieldSpec::extractive("FederalFilingStatus", Text, "What is the Federal Filing Status? If available"),
        FieldSpec::extractive("StateFilingStatus", Text, "What is the State Filing Status? (If available)"),
        FieldSpec::extractive("CurrentGrossPay", Number, "What is the Current Gross Pay?"),
        FieldSpec::extractive("YTDGrossPay", Number, "What is the YTD Gross Pay?"),
        FieldSpec::extractive("CurrentNetPay", Number, "What is the Current Net Pay?"),
        FieldSpec::extractive("YTDNetPay", Number, "What is the YTD Net Pay?"),
        FieldSpec::extractive("RegularHourlyRate", Number, "What is the Regular Hourly Rate? (if available)"),
        FieldSpec::extractive("HolidayHourlyRate", Number, "What is the Holiday Hourly Rate? (if available)"),
        FieldSpec::extractive("YTDFederalTax", Number, "What is the YTD Federal Taxes amount?"),
        FieldSpec::extractive("YTDStateTax", Number, "What are the YTD State Taxes?"),
        FieldSpec::extractive("is_ytd_gross_pay_highest", Boolean, "Is the YTD Gross Pay the largest amount in the entire paystub?"),
        FieldSpec::extractive("FederalTaxes", Boolean, "Extract the federal taxes"),
        FieldSpec::extractive("StateTaxes", Boolean, "Extract the state taxes"),
        FieldSpec::extractive("CityTaxes", Boolean, "Extract the city taxes"),
        FieldSpec::extractive("EmployeeNumber", Text, "What is the employee number?"),
        FieldSpec::extractive("PayrollNumber", Text, "What is the payroll number?"),
        FieldSpec::extractive("YTDCityTax", Number, "What are the YTD City Taxes?"),
        FieldSpec::extractive("CurrentTotalDeductions", Number, "What are the current total deductions?"),
        FieldSpec::extractive("YTDTotalDeductions", Number, "What are the YTD total deductions?"),
        FieldSpec::generative("is_gross_pay_valid", Boolean, "Is the YTD gross pay the largest dollar amount value on the paystub?"),
        FieldSpec::generative("are_field_names_sufficient", Boolean, "Are field names / key values sufficient for any validation?"),
        FieldSpec::generative("currency", Text, "What currency is used in this document? CAD, USD, EUR, etc."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_shape() {
        let spec = BlueprintSpec::new("custom_payslip")
            .with_description("A payslip")
            .with_document_class("Payslip")
            .with_field(FieldSpec::extractive(
                "CurrentGrossPay",
                FieldType::Number,
                "What is the Current Gross Pay?",
            ))
            .with_field(FieldSpec::generative(
                "PayDate",
                FieldType::String,
                "What is the Pay Date?",
            ));

        let schema = spec.to_json_schema();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DRAFT_07);
        assert_eq!(schema["documentClass"], "Payslip");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["CurrentGrossPay"]["type"], "number");
        assert_eq!(
            schema["properties"]["CurrentGrossPay"]["inferenceType"],
            "extractive"
        );
        assert_eq!(schema["properties"]["PayDate"]["inferenceType"], "generative");
        assert_eq!(
            schema["properties"]["PayDate"]["description"],
            "What is the Pay Date?"
        );
    }

    #[test]
    fn test_payslip_preset() {
        let spec = payslip_blueprint("custom_payslip");
        assert_eq!(spec.name, "custom_payslip");
        assert_eq!(spec.fields.len(), 28);

        let schema = spec.to_json_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 28);
        assert_eq!(properties["YTDNetPay"]["type"], "number");
        assert_eq!(properties["CityTaxes"]["type"], "boolean");
        assert_eq!(properties["currency"]["inferenceType"], "generative");
    }
}
