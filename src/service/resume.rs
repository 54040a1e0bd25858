//! Resume (personal-data form) records.
//!
//! Documents keep every caller-supplied field; the service only owns
//! `id`, `createdAt` and `updatedAt`, and insists on a non-empty `name`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{
    into_object, load_document, load_raw, merge_document, new_document, remove_document,
    save_document, scan_documents,
};
use crate::error::{ServiceError, ServiceResult};
use crate::model::Created;
use crate::model::resume::{ResumeSummary, ResumeUpdated};
use crate::store::{RESUMES, RecordStore};
use crate::utils::validation::non_empty_str;

const NOT_FOUND: &str = "Form not found.";
const NAME_REQUIRED: &str = "Form must include a name field.";

pub struct ResumeService {
    store: Arc<dyn RecordStore>,
}

impl ResumeService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: Value) -> ServiceResult<Created> {
        let payload = into_object(payload, "Form")?;
        if non_empty_str(&payload, "name").is_none() {
            debug!("Resume rejected: missing name");
            return Err(ServiceError::Validation(NAME_REQUIRED.into()));
        }

        let (id, created_at, doc) = new_document(payload);
        save_document(self.store.as_ref(), RESUMES, &id, &doc).await?;

        info!(resume_id = %id, "Resume created");
        Ok(Created { id, created_at })
    }

    pub async fn list(&self) -> ServiceResult<Vec<ResumeSummary>> {
        let docs = scan_documents(self.store.as_ref(), RESUMES).await?;
        Ok(docs.iter().map(ResumeSummary::from_document).collect())
    }

    /// The stored document, byte for byte.
    pub async fn get(&self, id: &str) -> ServiceResult<String> {
        load_raw(self.store.as_ref(), RESUMES, id, NOT_FOUND).await
    }

    /// Merge `payload` over the stored form. `name` may be omitted but
    /// not blanked.
    pub async fn update(&self, id: &str, payload: Value) -> ServiceResult<ResumeUpdated> {
        let patch = into_object(payload, "Form")?;
        let existing = load_document(self.store.as_ref(), RESUMES, id, NOT_FOUND).await?;
        if patch.contains_key("name") && non_empty_str(&patch, "name").is_none() {
            debug!(resume_id = %id, "Resume update rejected: blank name");
            return Err(ServiceError::Validation(NAME_REQUIRED.into()));
        }

        let (merged, updated_at) = merge_document(id, existing, patch);
        save_document(self.store.as_ref(), RESUMES, id, &merged).await?;

        info!(resume_id = %id, "Resume updated");
        Ok(ResumeUpdated {
            id: id.to_string(),
            updated_at,
        })
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        remove_document(self.store.as_ref(), RESUMES, id, NOT_FOUND).await?;
        info!(resume_id = %id, "Resume deleted");
        Ok(())
    }
}
