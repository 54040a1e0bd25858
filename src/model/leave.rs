use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{field_str, name_or_unnamed};

/// Well-known leave statuses. The stored field is a free-form string;
/// only these values drive notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Denied => "denied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(LeaveStatus::Pending),
            "approved" => Some(LeaveStatus::Approved),
            "denied" => Some(LeaveStatus::Denied),
            _ => None,
        }
    }

    /// Approved and denied close the request from the employee's side.
    pub fn is_decision(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Denied)
    }
}

/// Request body accepted by `POST /leaves`. Extra fields are kept.
/// Handlers take the raw JSON object; this type only documents it.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateLeave {
    #[schema(example = "Asha")]
    pub employee_name: String,
    #[schema(example = "asha@example.com")]
    pub employee_email: String,
    #[schema(example = "E-1001")]
    pub employee_id: Option<String>,
    #[schema(example = "sick")]
    pub leave_type: String,
    #[schema(example = "2024-01-01", format = "date")]
    pub start_date: String,
    #[schema(example = "2024-01-03", format = "date")]
    pub end_date: String,
    #[schema(example = "Flu")]
    pub reason: Option<String>,
}

/// List projection of a stored leave document.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
    #[schema(example = "3f2b8c1e-...")]
    pub id: Option<String>,
    #[schema(example = "Asha")]
    pub employee_name: String,
    #[schema(example = "sick")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<String>,
    #[schema(example = "2024-01-01")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[schema(example = "2024-01-03")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[schema(example = "pending")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[schema(example = "2024-01-01T09:30:00.000Z", format = "date-time")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl LeaveSummary {
    pub fn from_document(doc: &Map<String, Value>) -> Self {
        Self {
            id: field_str(doc, "id"),
            employee_name: name_or_unnamed(doc, "employeeName"),
            leave_type: field_str(doc, "leaveType"),
            start_date: field_str(doc, "startDate"),
            end_date: field_str(doc, "endDate"),
            status: field_str(doc, "status"),
            created_at: field_str(doc, "createdAt"),
        }
    }
}

/// Response to an update, approve or deny.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveUpdated {
    pub id: String,
    #[schema(example = "2024-01-02T10:00:00.000Z", format = "date-time")]
    pub updated_at: String,
    /// Whatever status the stored document now carries.
    #[schema(value_type = String, example = "approved")]
    pub status: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_str() {
        for s in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Denied] {
            assert_eq!(LeaveStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(LeaveStatus::parse("cancelled"), None);
        assert!(!LeaveStatus::Pending.is_decision());
        assert!(LeaveStatus::Denied.is_decision());
    }

    #[test]
    fn summary_defaults_name_and_omits_absent_fields() {
        let doc = json!({ "id": "x", "status": "pending", "reason": "flu" });
        let summary = LeaveSummary::from_document(doc.as_object().unwrap());

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({ "id": "x", "employeeName": "Unnamed", "status": "pending" })
        );
    }
}
