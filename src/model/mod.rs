pub mod leave;
pub mod resume;

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Stored documents are JSON objects with caller-defined fields.
pub type Document = Map<String, Value>;

/// Response to any create call.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    #[schema(example = "3f2b8c1e-5a7d-4c1e-9f0a-2b6d8e4c1a90")]
    pub id: String,
    #[schema(example = "2024-01-01T09:30:00.000Z", format = "date-time")]
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    #[schema(example = "Leave form deleted successfully.")]
    pub message: String,
}

pub(crate) fn field_str(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Display name for list views; blank or missing becomes "Unnamed".
pub(crate) fn name_or_unnamed(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unnamed")
        .to_string()
}
