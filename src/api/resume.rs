use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;

use super::log_failure;
use crate::model::resume::{ResumeSummary, ResumeUpdated};
use crate::model::{Created, Message};
use crate::service::ResumeService;

/* =========================
Create resume
========================= */
/// Store a new resume form. Any fields are accepted; `name` is required.
#[utoipa::path(
    post,
    path = "/resumes",
    request_body(
        content = Object,
        description = "Resume form; must contain a non-empty `name`",
        content_type = "application/json",
        example = json!({ "name": "Nimal Perera", "email": "nimal@example.com", "skills": ["rust"] })
    ),
    responses(
        (status = 201, description = "Resume stored", body = Created),
        (status = 400, description = "Missing name", body = Object, example = json!({
            "error": "Form must include a name field."
        })),
        (status = 500, description = "Store failure")
    ),
    tag = "Resume"
)]
pub async fn create_resume(
    svc: web::Data<ResumeService>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let created = svc
        .create(payload.into_inner())
        .await
        .inspect_err(|e| log_failure(e, "Save resume form", None))?;

    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/resumes",
    responses(
        (status = 200, description = "Summaries of every stored resume", body = Vec<ResumeSummary>),
        (status = 500, description = "Store failure")
    ),
    tag = "Resume"
)]
pub async fn list_resumes(svc: web::Data<ResumeService>) -> actix_web::Result<impl Responder> {
    let list = svc
        .list()
        .await
        .inspect_err(|e| log_failure(e, "List resume forms", None))?;

    Ok(HttpResponse::Ok().json(list))
}

/// Full stored document, exactly as saved.
#[utoipa::path(
    get,
    path = "/resumes/{id}",
    params(("id" = String, Path, description = "Resume id")),
    responses(
        (status = 200, description = "Resume document", body = Object),
        (status = 404, description = "Form not found", body = Object, example = json!({ "error": "Form not found." })),
        (status = 500, description = "Store failure")
    ),
    tag = "Resume"
)]
pub async fn get_resume(
    svc: web::Data<ResumeService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let raw = svc
        .get(&id)
        .await
        .inspect_err(|e| log_failure(e, "Read resume form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(raw))
}

#[utoipa::path(
    put,
    path = "/resumes/{id}",
    params(("id" = String, Path, description = "Resume id")),
    request_body(
        content = Object,
        description = "Fields to overlay on the stored form",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Resume updated", body = ResumeUpdated),
        (status = 400, description = "Blank name"),
        (status = 404, description = "Form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Resume"
)]
pub async fn update_resume(
    svc: web::Data<ResumeService>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let updated = svc
        .update(&id, payload.into_inner())
        .await
        .inspect_err(|e| log_failure(e, "Update resume form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/resumes/{id}",
    params(("id" = String, Path, description = "Resume id")),
    responses(
        (status = 200, description = "Resume deleted", body = Message),
        (status = 404, description = "Form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Resume"
)]
pub async fn delete_resume(
    svc: web::Data<ResumeService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    svc.delete(&id)
        .await
        .inspect_err(|e| log_failure(e, "Delete resume form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(Message {
        message: "Resume deleted successfully".into(),
    }))
}
