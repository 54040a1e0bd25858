pub mod leave;
pub mod resume;

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};

use crate::error::ServiceError;
use crate::store::RecordStore;

/// Log the full detail of a server-side failure; the client only sees
/// a generic message.
pub(crate) fn log_failure(e: &ServiceError, action: &str, id: Option<&str>) {
    if e.is_internal() {
        tracing::error!(error = %e, id, "{action} failed");
    }
}

/// Liveness probe that also checks the record store.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = Object, example = json!({ "status": "ok" })),
        (status = 503, description = "Store unreachable", body = Object, example = json!({ "status": "unavailable" }))
    ),
    tag = "Health"
)]
pub async fn health(store: web::Data<Arc<dyn RecordStore>>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
        }
    }
}
