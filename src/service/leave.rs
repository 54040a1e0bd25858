//! Leave requests and their status workflow.
//!
//! A request starts `pending`. Status is otherwise a free-form string:
//! any value may be written through `update`, and the only gate on the
//! employee notification is that the status actually changed to
//! `approved` or `denied`. Record writes always precede notification
//! attempts, and notification failures never reach the caller.
//!
//! Updates are get-then-set with no lock; concurrent writers to the
//! same id may lose updates.

use std::sync::Arc;

use futures::future::join;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    into_object, load_document, load_raw, merge_document, new_document, remove_document,
    save_document, scan_documents,
};
use crate::error::{ServiceError, ServiceResult};
use crate::model::leave::{LeaveStatus, LeaveSummary, LeaveUpdated};
use crate::model::{Created, Document};
use crate::notifier::Notifier;
use crate::store::{LEAVES, RecordStore};
use crate::utils::validation::{is_valid_email, missing_fields, non_empty_str};

const NOT_FOUND: &str = "Leave form not found.";

const REQUIRED_FIELDS: [&str; 5] = [
    "employeeName",
    "leaveType",
    "startDate",
    "endDate",
    "employeeEmail",
];

/// Where leave mail goes and how action links are built.
#[derive(Clone, Debug, Default)]
pub struct LeaveMailSettings {
    /// Receives every new request. None skips the admin mail.
    pub admin_email: Option<String>,
    /// Public URL prefix for `/leaves/approve/{id}` and `/leaves/deny/{id}`.
    pub action_base_url: String,
}

pub struct LeaveService {
    store: Arc<dyn RecordStore>,
    notifier: Notifier,
    mail: LeaveMailSettings,
}

impl LeaveService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Notifier, mail: LeaveMailSettings) -> Self {
        Self {
            store,
            notifier,
            mail,
        }
    }

    pub async fn create(&self, payload: Value) -> ServiceResult<Created> {
        let payload = into_object(payload, "Leave")?;

        let missing = missing_fields(&payload, &REQUIRED_FIELDS);
        if !missing.is_empty() {
            debug!(?missing, "Leave rejected: missing fields");
            return Err(ServiceError::Validation(format!(
                "Missing required leave information: {}.",
                missing.join(", ")
            )));
        }
        let email = non_empty_str(&payload, "employeeEmail").unwrap_or_default();
        if !is_valid_email(email) {
            debug!(email, "Leave rejected: invalid email");
            return Err(ServiceError::Validation(
                "Invalid employee email address.".into(),
            ));
        }

        let (id, created_at, mut doc) = new_document(payload);
        doc.insert(
            "status".into(),
            Value::String(LeaveStatus::Pending.as_str().into()),
        );
        save_document(self.store.as_ref(), LEAVES, &id, &doc).await?;
        info!(leave_id = %id, "Leave request created");

        join(self.notify_admin(&id, &doc), self.notify_receipt(&doc)).await;

        Ok(Created { id, created_at })
    }

    pub async fn list(&self) -> ServiceResult<Vec<LeaveSummary>> {
        let docs = scan_documents(self.store.as_ref(), LEAVES).await?;
        Ok(docs.iter().map(LeaveSummary::from_document).collect())
    }

    /// The stored document, byte for byte.
    pub async fn get(&self, id: &str) -> ServiceResult<String> {
        load_raw(self.store.as_ref(), LEAVES, id, NOT_FOUND).await
    }

    /// Merge `payload` over the stored request. Mails the employee only
    /// when `status` changes to a decision.
    pub async fn update(&self, id: &str, payload: Value) -> ServiceResult<LeaveUpdated> {
        let patch = into_object(payload, "Leave")?;
        let existing = load_document(self.store.as_ref(), LEAVES, id, NOT_FOUND).await?;
        let previous_status = existing.get("status").cloned();
        let requested_status = patch.get("status").cloned();

        let (merged, updated_at) = merge_document(id, existing, patch);
        save_document(self.store.as_ref(), LEAVES, id, &merged).await?;
        info!(leave_id = %id, "Leave request updated");

        let decision = requested_status
            .filter(|s| Some(s) != previous_status.as_ref())
            .and_then(|s| s.as_str().and_then(LeaveStatus::parse))
            .filter(LeaveStatus::is_decision);
        let email = non_empty_str(&merged, "employeeEmail");
        if let (Some(decision), Some(email)) = (decision, email) {
            self.notify_decision(email, decision, &merged).await;
        }

        Ok(updated_response(id, updated_at, &merged))
    }

    pub async fn approve(&self, id: &str) -> ServiceResult<LeaveUpdated> {
        self.decide(id, LeaveStatus::Approved).await
    }

    pub async fn deny(&self, id: &str) -> ServiceResult<LeaveUpdated> {
        self.decide(id, LeaveStatus::Denied).await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        remove_document(self.store.as_ref(), LEAVES, id, NOT_FOUND).await?;
        info!(leave_id = %id, "Leave request deleted");
        Ok(())
    }

    /// Explicit approve/deny: always writes the status and always tries
    /// to tell the employee.
    async fn decide(&self, id: &str, decision: LeaveStatus) -> ServiceResult<LeaveUpdated> {
        let existing = load_document(self.store.as_ref(), LEAVES, id, NOT_FOUND).await?;
        let mut patch = Document::new();
        patch.insert("status".into(), Value::String(decision.as_str().into()));

        let (merged, updated_at) = merge_document(id, existing, patch);
        save_document(self.store.as_ref(), LEAVES, id, &merged).await?;
        info!(leave_id = %id, status = decision.as_str(), "Leave request decided");

        match non_empty_str(&merged, "employeeEmail") {
            Some(email) => self.notify_decision(email, decision, &merged).await,
            None => warn!(leave_id = %id, "No employee email on record; decision not mailed"),
        }

        Ok(updated_response(id, updated_at, &merged))
    }

    async fn notify_admin(&self, id: &str, doc: &Document) {
        let Some(admin) = self.mail.admin_email.as_deref() else {
            warn!(leave_id = %id, "ADMIN_EMAIL not set; admin notification skipped");
            return;
        };
        let name = text(doc, "employeeName");
        let subject = format!("New leave request from {name}");
        self.notifier
            .send(admin, &subject, &admin_body(&self.mail.action_base_url, id, doc))
            .await;
    }

    async fn notify_receipt(&self, doc: &Document) {
        let Some(email) = non_empty_str(doc, "employeeEmail") else {
            return;
        };
        let body = format!(
            "<p>Hello {},</p>\
             <p>We received your {} leave request for {} to {}. \
             Its status is <b>pending</b>; you will be emailed when it is reviewed.</p>",
            escape(&text(doc, "employeeName")),
            escape(&text(doc, "leaveType")),
            escape(&text(doc, "startDate")),
            escape(&text(doc, "endDate")),
        );
        self.notifier
            .send(email, "Leave request received", &body)
            .await;
    }

    async fn notify_decision(&self, email: &str, decision: LeaveStatus, doc: &Document) {
        let status = decision.as_str();
        let body = format!(
            "<p>Hello {},</p>\
             <p>Your {} leave request for {} to {} has been <b>{}</b>.</p>",
            escape(&text(doc, "employeeName")),
            escape(&text(doc, "leaveType")),
            escape(&text(doc, "startDate")),
            escape(&text(doc, "endDate")),
            status,
        );
        self.notifier
            .send(email, &format!("Leave request {status}"), &body)
            .await;
    }
}

fn updated_response(id: &str, updated_at: String, doc: &Document) -> LeaveUpdated {
    LeaveUpdated {
        id: id.to_string(),
        updated_at,
        status: doc.get("status").cloned().unwrap_or(Value::Null),
    }
}

/// Display text for a field; non-strings are rendered as JSON.
fn text(doc: &Document, field: &str) -> String {
    match doc.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn admin_body(base_url: &str, id: &str, doc: &Document) -> String {
    let rows: String = doc
        .iter()
        .map(|(k, _)| {
            format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                escape(k),
                escape(&text(doc, k))
            )
        })
        .collect();
    format!(
        "<p>A new leave request needs review.</p>\
         <table>{rows}</table>\
         <p><a href=\"{base}/leaves/approve/{id}\">Approve</a> | \
         <a href=\"{base}/leaves/deny/{id}\">Deny</a></p>",
        base = base_url,
        id = escape(id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::testing::{FailingTransport, RecordingTransport};
    use crate::store::MemoryStore;
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryStore>,
        mail: Arc<RecordingTransport>,
        svc: LeaveService,
    }

    fn settings() -> LeaveMailSettings {
        LeaveMailSettings {
            admin_email: Some("hr@example.com".into()),
            action_base_url: "https://hr.example.com".into(),
        }
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mail = Arc::new(RecordingTransport::default());
        let svc = LeaveService::new(store.clone(), Notifier::new(mail.clone()), settings());
        Fixture { store, mail, svc }
    }

    fn asha() -> Value {
        json!({
            "employeeName": "Asha",
            "leaveType": "sick",
            "startDate": "2024-01-01",
            "endDate": "2024-01-03",
            "employeeEmail": "asha@example.com",
        })
    }

    async fn doc(svc: &LeaveService, id: &str) -> Value {
        serde_json::from_str(&svc.get(id).await.unwrap()).unwrap()
    }

    #[actix_web::test]
    async fn create_stores_pending_and_mails_admin_and_employee() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();

        let stored = doc(&f.svc, &created.id).await;
        assert_eq!(stored["id"], json!(created.id));
        assert_eq!(stored["status"], "pending");
        assert_eq!(stored["createdAt"], json!(created.created_at));

        let sent = f.mail.sent();
        assert_eq!(sent.len(), 2);
        let admin = sent.iter().find(|m| m.to == "hr@example.com").unwrap();
        assert_eq!(admin.subject, "New leave request from Asha");
        assert!(admin.body.contains(&format!(
            "https://hr.example.com/leaves/approve/{}",
            created.id
        )));
        assert!(admin.body.contains(&format!(
            "https://hr.example.com/leaves/deny/{}",
            created.id
        )));
        let receipt = sent.iter().find(|m| m.to == "asha@example.com").unwrap();
        assert_eq!(receipt.subject, "Leave request received");
    }

    #[actix_web::test]
    async fn create_ignores_caller_status() {
        let f = fixture();
        let mut payload = asha();
        payload["status"] = json!("approved");

        let created = f.svc.create(payload).await.unwrap();
        assert_eq!(doc(&f.svc, &created.id).await["status"], "pending");
    }

    #[actix_web::test]
    async fn create_drops_caller_updated_at() {
        let f = fixture();
        let mut payload = asha();
        payload["updatedAt"] = json!("2999-01-01T00:00:00.000Z");

        let created = f.svc.create(payload).await.unwrap();
        assert!(doc(&f.svc, &created.id).await.get("updatedAt").is_none());

        let updated = f.svc.update(&created.id, json!({ "reason": "flu" })).await.unwrap();
        assert!(updated.updated_at > created.created_at);
        assert!(updated.updated_at.as_str() < "2999-01-01T00:00:00.000Z");
    }

    #[actix_web::test]
    async fn create_rejects_missing_or_bad_email_without_writing() {
        let f = fixture();

        let mut no_email = asha();
        no_email.as_object_mut().unwrap().remove("employeeEmail");
        let mut bad_email = asha();
        bad_email["employeeEmail"] = json!("not-an-email");

        for payload in [no_email, bad_email] {
            let err = f.svc.create(payload).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        assert!(f.store.get_all(LEAVES).await.unwrap().is_empty());
        assert!(f.mail.sent().is_empty());
    }

    #[actix_web::test]
    async fn create_names_every_missing_field() {
        let f = fixture();
        let err = f
            .svc
            .create(json!({ "employeeName": "Asha" }))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required leave information: leaveType, startDate, endDate, employeeEmail."
        );
    }

    #[actix_web::test]
    async fn create_survives_notifier_failure() {
        let store = Arc::new(MemoryStore::new());
        let svc = LeaveService::new(
            store.clone(),
            Notifier::new(Arc::new(FailingTransport)),
            settings(),
        );

        let created = svc.create(asha()).await.unwrap();
        assert_eq!(doc(&svc, &created.id).await["employeeName"], "Asha");
    }

    #[actix_web::test]
    async fn create_without_admin_only_mails_employee() {
        let store = Arc::new(MemoryStore::new());
        let mail = Arc::new(RecordingTransport::default());
        let svc = LeaveService::new(
            store,
            Notifier::new(mail.clone()),
            LeaveMailSettings::default(),
        );

        svc.create(asha()).await.unwrap();
        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "asha@example.com");
    }

    #[actix_web::test]
    async fn approve_via_update_scenario() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();

        let updated = f
            .svc
            .update(&created.id, json!({ "status": "approved" }))
            .await
            .unwrap();
        assert_eq!(updated.status, json!("approved"));
        assert!(updated.updated_at > created.created_at);

        let stored = doc(&f.svc, &created.id).await;
        assert_eq!(stored["status"], "approved");
        assert_eq!(stored["updatedAt"], json!(updated.updated_at));
        assert_eq!(stored["createdAt"], json!(created.created_at));

        let decision = f.mail.sent().into_iter().last().unwrap();
        assert_eq!(decision.to, "asha@example.com");
        assert_eq!(decision.subject, "Leave request approved");
    }

    #[actix_web::test]
    async fn update_with_same_status_does_not_mail() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();
        f.svc
            .update(&created.id, json!({ "status": "denied" }))
            .await
            .unwrap();
        let before = f.mail.sent().len();

        f.svc
            .update(&created.id, json!({ "status": "denied", "reason": "moved" }))
            .await
            .unwrap();
        assert_eq!(f.mail.sent().len(), before);
    }

    #[actix_web::test]
    async fn update_to_non_decision_status_is_stored_without_mail() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();
        let before = f.mail.sent().len();

        let updated = f
            .svc
            .update(&created.id, json!({ "status": "on-hold" }))
            .await
            .unwrap();
        assert_eq!(updated.status, json!("on-hold"));
        assert_eq!(f.mail.sent().len(), before);
    }

    #[actix_web::test]
    async fn update_without_status_keeps_status_and_does_not_mail() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();
        let before = f.mail.sent().len();

        let updated = f
            .svc
            .update(&created.id, json!({ "endDate": "2024-01-05" }))
            .await
            .unwrap();
        assert_eq!(updated.status, json!("pending"));
        assert_eq!(doc(&f.svc, &created.id).await["endDate"], "2024-01-05");
        assert_eq!(f.mail.sent().len(), before);
    }

    #[actix_web::test]
    async fn update_unknown_is_not_found() {
        let f = fixture();
        let err = f
            .svc
            .update("ghost", json!({ "status": "approved" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(!f.store.exists(LEAVES, "ghost").await.unwrap());
    }

    #[actix_web::test]
    async fn successive_updates_have_increasing_timestamps() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();

        let first = f.svc.update(&created.id, json!({ "reason": "a" })).await.unwrap();
        let second = f.svc.update(&created.id, json!({ "reason": "b" })).await.unwrap();
        assert!(first.updated_at > created.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[actix_web::test]
    async fn deny_always_mails_even_when_already_denied() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();
        let before = f.mail.sent().len();

        f.svc.deny(&created.id).await.unwrap();
        let updated = f.svc.deny(&created.id).await.unwrap();

        assert_eq!(updated.status, json!("denied"));
        let sent = f.mail.sent();
        assert_eq!(sent.len(), before + 2);
        assert!(sent[before..].iter().all(|m| m.subject == "Leave request denied"));
    }

    #[actix_web::test]
    async fn approve_without_email_still_updates() {
        let f = fixture();
        // written before email became mandatory
        f.store
            .set(
                LEAVES,
                "old",
                r#"{"id":"old","employeeName":"Ravi","status":"pending","createdAt":"2023-01-01T00:00:00.000Z"}"#,
            )
            .await
            .unwrap();

        let updated = f.svc.approve("old").await.unwrap();
        assert_eq!(updated.status, json!("approved"));
        assert!(f.mail.sent().is_empty());
    }

    #[actix_web::test]
    async fn approve_unknown_is_not_found() {
        let f = fixture();
        assert!(matches!(f.svc.approve("ghost").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.svc.deny("ghost").await, Err(ServiceError::NotFound(_))));
    }

    #[actix_web::test]
    async fn list_projects_summaries() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();

        let list = f.svc.list().await.unwrap();
        assert_eq!(list.len(), 1);
        let s = &list[0];
        assert_eq!(s.id.as_deref(), Some(created.id.as_str()));
        assert_eq!(s.employee_name, "Asha");
        assert_eq!(s.leave_type.as_deref(), Some("sick"));
        assert_eq!(s.status.as_deref(), Some("pending"));
        assert_eq!(s.created_at.as_deref(), Some(created.created_at.as_str()));
    }

    #[actix_web::test]
    async fn delete_unknown_leaves_bucket_unchanged() {
        let f = fixture();
        let created = f.svc.create(asha()).await.unwrap();

        assert!(matches!(f.svc.delete("ghost").await, Err(ServiceError::NotFound(_))));
        let all = f.store.get_all(LEAVES).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key(&created.id));

        f.svc.delete(&created.id).await.unwrap();
        assert!(f.store.get_all(LEAVES).await.unwrap().is_empty());
    }

    #[test]
    fn admin_body_escapes_fields() {
        let d = json!({ "employeeName": "<script>", "id": "x" });
        let body = admin_body("https://b", "x", d.as_object().unwrap());
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
