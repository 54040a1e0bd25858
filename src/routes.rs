use crate::{
    api::{self, leave, resume},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError},
    middleware::Condition,
    web,
};
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst are non-zero");
        Governor::new(&cfg)
    }

    let limiter = Condition::new(
        config.rate_api_per_min > 0,
        build_limiter(config.rate_api_per_min),
    );

    cfg.app_data(
        web::JsonConfig::default()
            .limit(config.json_limit_bytes)
            .error_handler(json_error_handler),
    );

    cfg.route("/health", web::get().to(api::health));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter)
            // legacy single-form endpoint
            .service(web::resource("/resume").route(web::post().to(resume::create_resume)))
            .service(
                web::scope("/resumes")
                    // /resumes
                    .service(
                        web::resource("")
                            .route(web::post().to(resume::create_resume))
                            .route(web::get().to(resume::list_resumes)),
                    )
                    // /resumes/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(resume::get_resume))
                            .route(web::put().to(resume::update_resume))
                            .route(web::delete().to(resume::delete_resume)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::leave_list))
                            .route(web::post().to(leave::create_leave)),
                    )
                    // /leaves/approve/{id}, linked from the admin mail
                    .service(
                        web::resource("/approve/{id}").route(web::get().to(leave::approve_leave)),
                    )
                    // /leaves/deny/{id}
                    .service(web::resource("/deny/{id}").route(web::get().to(leave::deny_leave)))
                    // /leaves/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave::get_leave))
                            .route(web::put().to(leave::update_leave))
                            .route(web::delete().to(leave::delete_leave)),
                    ),
            ),
    );
}

/// Malformed or oversized bodies get the same `{"error": ...}` shape as
/// every other client error.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}
