//! Result renderer - turns an extraction result into a display table.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::upload::ObjectStoreGateway;
use crate::traits::store::ObjectStore;
use crate::types::{
    location::StorageLocation,
    result::{ExtractionResult, Rendering, ResultRow, ResultTable},
};

/// Fetch the result document at `location` and render it.
pub async fn render_location<S: ObjectStore>(
    gateway: &ObjectStoreGateway<S>,
    location: &StorageLocation,
) -> Result<Rendering> {
    let result: ExtractionResult = gateway.fetch_json(location).await?;
    debug!(location = %location, fields = result.len(), "Fetched extraction result");
    Ok(render(&result))
}

/// Drop null and empty-string values, sort by field name, number from 1.
pub fn render(result: &ExtractionResult) -> Rendering {
    let mut entries: Vec<(&String, &Value)> = result
        .inference_result
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .collect();

    if entries.is_empty() {
        return Rendering::NoValidResults;
    }

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(i, (field, value))| ResultRow {
            index: i + 1,
            field: field.clone(),
            value: display_value(value),
        })
        .collect();

    Rendering::Table(ResultTable { rows })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Strings verbatim, other scalars in their JSON spelling, nested values as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
