use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{field_str, name_or_unnamed};

/// List projection of a stored resume document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Option<String>,
    #[schema(example = "Nimal Perera")]
    pub name: String,
    #[schema(example = "2024-01-01T09:30:00.000Z", format = "date-time")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ResumeSummary {
    pub fn from_document(doc: &Map<String, Value>) -> Self {
        Self {
            id: field_str(doc, "id"),
            name: name_or_unnamed(doc, "name"),
            created_at: field_str(doc, "createdAt"),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdated {
    pub id: String,
    #[schema(example = "2024-01-02T10:00:00.000Z", format = "date-time")]
    pub updated_at: String,
}
