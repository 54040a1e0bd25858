pub mod leave;
pub mod resume;

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::model::Document;
use crate::store::RecordStore;

pub use leave::LeaveService;
pub use resume::ResumeService;

/// Fields the service owns; payloads never overwrite them.
const ID: &str = "id";
const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn now_timestamp() -> String {
    format_ts(Utc::now())
}

/// Current time, but never earlier than 1ms past the document's last
/// recorded change, so `updatedAt` strictly increases per document.
pub(crate) fn next_timestamp(doc: &Document) -> String {
    // stored stamps carry millisecond precision; compare at the same grain
    let now = Utc::now().trunc_subsecs(3);
    let last = [UPDATED_AT, CREATED_AT]
        .iter()
        .filter_map(|f| doc.get(*f).and_then(Value::as_str))
        .filter_map(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .max();

    match last {
        Some(last) if now <= last => format_ts(last + Duration::milliseconds(1)),
        _ => format_ts(now),
    }
}

/// Payloads must be JSON objects.
pub(crate) fn into_object(payload: Value, what: &str) -> ServiceResult<Document> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ServiceError::Validation(format!(
            "{what} payload must be a JSON object."
        ))),
    }
}

pub(crate) fn parse_document(id: &str, raw: &str) -> ServiceResult<Document> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ServiceError::Corrupt(format!("{id}: not a JSON object"))),
        Err(e) => Err(ServiceError::Corrupt(format!("{id}: {e}"))),
    }
}

/// Stamp a fresh document: payload fields first, then service-owned
/// `id` and `createdAt` on top. A new document has no `updatedAt`.
pub(crate) fn new_document(mut payload: Document) -> (String, String, Document) {
    let id = new_id();
    let created_at = now_timestamp();
    payload.remove(UPDATED_AT);
    payload.insert(ID.into(), Value::String(id.clone()));
    payload.insert(CREATED_AT.into(), Value::String(created_at.clone()));
    (id, created_at, payload)
}

/// Overlay `patch` onto `existing`, keeping `id`/`createdAt` and
/// stamping a new `updatedAt`. Returns the merged document and the
/// timestamp.
pub(crate) fn merge_document(id: &str, existing: Document, patch: Document) -> (Document, String) {
    let updated_at = next_timestamp(&existing);
    let created_at = existing.get(CREATED_AT).cloned();

    let mut merged = existing;
    merged.extend(patch);
    merged.insert(ID.into(), Value::String(id.to_string()));
    match created_at {
        Some(v) => {
            merged.insert(CREATED_AT.into(), v);
        }
        None => {
            merged.remove(CREATED_AT);
        }
    }
    merged.insert(UPDATED_AT.into(), Value::String(updated_at.clone()));
    (merged, updated_at)
}

pub(crate) async fn load_raw(
    store: &dyn RecordStore,
    bucket: &str,
    id: &str,
    not_found: &str,
) -> ServiceResult<String> {
    store
        .get(bucket, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(not_found.to_string()))
}

pub(crate) async fn load_document(
    store: &dyn RecordStore,
    bucket: &str,
    id: &str,
    not_found: &str,
) -> ServiceResult<Document> {
    let raw = load_raw(store, bucket, id, not_found).await?;
    parse_document(id, &raw)
}

pub(crate) async fn save_document(
    store: &dyn RecordStore,
    bucket: &str,
    id: &str,
    doc: &Document,
) -> ServiceResult<()> {
    let raw = serde_json::to_string(doc)
        .map_err(|e| ServiceError::Corrupt(format!("{id}: {e}")))?;
    store.set(bucket, id, &raw).await?;
    Ok(())
}

/// Every document in a bucket, in store iteration order.
pub(crate) async fn scan_documents(
    store: &dyn RecordStore,
    bucket: &str,
) -> ServiceResult<Vec<Document>> {
    store
        .get_all(bucket)
        .await?
        .iter()
        .map(|(id, raw)| parse_document(id, raw))
        .collect()
}

pub(crate) async fn remove_document(
    store: &dyn RecordStore,
    bucket: &str,
    id: &str,
    not_found: &str,
) -> ServiceResult<()> {
    if !store.exists(bucket, id).await? {
        return Err(ServiceError::NotFound(not_found.to_string()));
    }
    if !store.delete(bucket, id).await? {
        // removed by someone else between the two calls
        return Err(ServiceError::NotFound(not_found.to_string()));
    }
    Ok(())
}
