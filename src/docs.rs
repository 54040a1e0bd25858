use crate::model::leave::{CreateLeave, LeaveStatus, LeaveSummary, LeaveUpdated};
use crate::model::resume::{ResumeSummary, ResumeUpdated};
use crate::model::{Created, Message};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Formkeeper API",
        version = "0.1.0",
        description = r#"
## Resume & Leave Forms

Stores two kinds of submitted forms in Redis hash buckets:

- **Resumes**: free-form personal-data documents with a required `name`
- **Leaves**: employee leave requests with a `pending → approved | denied` workflow

New leave requests mail HR with one-click approve/deny links and send the
employee a receipt. Status decisions are mailed to the employee. Mail is
best-effort and never fails a request.

### Response Format
- `GET /{bucket}/{id}` returns the stored JSON document verbatim
- Errors are `{"error": "<message>"}`
"#,
    ),
    paths(
        crate::api::health,

        crate::api::resume::create_resume,
        crate::api::resume::list_resumes,
        crate::api::resume::get_resume,
        crate::api::resume::update_resume,
        crate::api::resume::delete_resume,

        crate::api::leave::create_leave,
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::update_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::deny_leave,
        crate::api::leave::delete_leave
    ),
    components(
        schemas(
            Created,
            Message,
            ResumeSummary,
            ResumeUpdated,
            CreateLeave,
            LeaveStatus,
            LeaveSummary,
            LeaveUpdated
        )
    ),
    tags(
        (name = "Resume", description = "Resume form APIs"),
        (name = "Leave", description = "Leave request APIs"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn leave_schemas_use_wire_names() {
        let doc: Value = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];

        let create = &schemas["CreateLeave"]["properties"];
        assert!(create.get("employeeName").is_some());
        assert!(create.get("employeeEmail").is_some());
        assert!(create.get("employee_name").is_none());

        assert_eq!(
            schemas["LeaveStatus"]["enum"],
            json!(["pending", "approved", "denied"])
        );
    }
}
