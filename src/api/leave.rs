use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;

use super::log_failure;
use crate::model::leave::{CreateLeave, LeaveSummary, LeaveUpdated};
use crate::model::{Created, Message};
use crate::service::LeaveService;

/* =========================
Create leave request
========================= */
/// Submit a leave request. HR is mailed approve/deny links and the
/// employee gets a receipt; mail failures do not affect the response.
#[utoipa::path(
    post,
    path = "/leaves",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request stored as pending", body = Created),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "error": "Invalid employee email address."
        })),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    svc: web::Data<LeaveService>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let created = svc
        .create(payload.into_inner())
        .await
        .inspect_err(|e| log_failure(e, "Save leave form", None))?;

    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/leaves",
    responses(
        (status = 200, description = "Summaries of every leave request", body = Vec<LeaveSummary>),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn leave_list(svc: web::Data<LeaveService>) -> actix_web::Result<impl Responder> {
    let list = svc
        .list()
        .await
        .inspect_err(|e| log_failure(e, "List leaves", None))?;

    Ok(HttpResponse::Ok().json(list))
}

/// Full stored document, exactly as saved.
#[utoipa::path(
    get,
    path = "/leaves/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave document", body = Object),
        (status = 404, description = "Leave form not found", body = Object, example = json!({
            "error": "Leave form not found."
        })),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let raw = svc
        .get(&id)
        .await
        .inspect_err(|e| log_failure(e, "Read leave form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(raw))
}

/// Overlay fields on a leave request. Changing `status` to approved or
/// denied mails the employee.
#[utoipa::path(
    put,
    path = "/leaves/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    request_body(
        content = Object,
        description = "Fields to overlay, e.g. a new status",
        content_type = "application/json",
        example = json!({ "status": "approved" })
    ),
    responses(
        (status = 200, description = "Leave request updated", body = LeaveUpdated),
        (status = 404, description = "Leave form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let updated = svc
        .update(&id, payload.into_inner())
        .await
        .inspect_err(|e| log_failure(e, "Update leave form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Approve / deny (mail link targets)
========================= */
#[utoipa::path(
    get,
    path = "/leaves/approve/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave approved", body = LeaveUpdated),
        (status = 404, description = "Leave form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let updated = svc
        .approve(&id)
        .await
        .inspect_err(|e| log_failure(e, "Approve leave", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    get,
    path = "/leaves/deny/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave denied", body = LeaveUpdated),
        (status = 404, description = "Leave form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn deny_leave(
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let updated = svc
        .deny(&id)
        .await
        .inspect_err(|e| log_failure(e, "Deny leave", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/leaves/{id}",
    params(("id" = String, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request deleted", body = Message),
        (status = 404, description = "Leave form not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    svc: web::Data<LeaveService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    svc.delete(&id)
        .await
        .inspect_err(|e| log_failure(e, "Delete leave form", Some(id.as_str())))?;

    Ok(HttpResponse::Ok().json(Message {
        message: "Leave form deleted successfully.".into(),
    }))
}
