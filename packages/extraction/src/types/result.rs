//! Extraction results and their tabular rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The extraction result document: `{ "inference_result": { <field>: <value> } }`.
///
/// Only the flat `inference_result` mapping is modelled; any other keys the
/// service writes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub inference_result: Map<String, Value>,
}

impl ExtractionResult {
    pub fn new(inference_result: Map<String, Value>) -> Self {
        Self { inference_result }
    }

    pub fn len(&self) -> usize {
        self.inference_result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inference_result.is_empty()
    }
}

/// One displayed row, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub index: usize,
    pub field: String,
    pub value: String,
}

/// Two-column (Field, Value) table, sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub const HEADERS: [&'static str; 2] = ["Field", "Value"];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.field.as_str())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.field == field)
            .map(|row| row.value.as_str())
    }
}

/// Outcome of rendering a result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendering {
    Table(ResultTable),

    /// Every value was null or empty
    NoValidResults,
}

impl Rendering {
    pub fn table(&self) -> Option<&ResultTable> {
        match self {
            Self::Table(table) => Some(table),
            Self::NoValidResults => None,
        }
    }
}
