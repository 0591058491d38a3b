use actix_files::{Files, NamedFile};
use actix_multipart::Multipart;
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info, warn};
use serde_json::json;
use shared::{AnalyzeResponse, ErrorDetail, HealthResponse};

use crate::auth::middleware::{AuthMiddleware, AuthenticatedUser};
use crate::error::ServiceError;
use crate::upload::read_image_field;
use crate::usage::usage_service::UsageService;
use crate::vision::VisionService;

/// Only `/api/usage` and `/api/analyze` sit behind the bearer check. Any
/// other `/api/*` path is a JSON 404, with or without a token.
pub fn configure_api(cfg: &mut web::ServiceConfig, auth_middleware: AuthMiddleware) {
    cfg.service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api").route(web::get().to(service_info)))
        .service(
            web::resource("/api/usage")
                .route(web::get().to(check_usage))
                .wrap(auth_middleware.clone()),
        )
        .service(
            web::resource("/api/analyze")
                .route(web::post().to(analyze_image))
                .wrap(auth_middleware),
        )
        .service(web::scope("/api").default_service(web::to(api_not_found)));
}

/// Serves the trunk build. Unknown paths fall back to `index.html` so the
/// client can route `/analyze` itself.
pub fn configure_frontend(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    let index_path = format!("{}/index.html", frontend_dir);
    cfg.service(
        Files::new("/", frontend_dir)
            .index_file("index.html")
            .default_handler(fn_service(move |req: ServiceRequest| {
                let index_path = index_path.clone();
                async move {
                    let (req, _) = req.into_parts();
                    let file = NamedFile::open_async(index_path).await?;
                    let res = file.into_response(&req);
                    Ok(ServiceResponse::new(req, res))
                }
            })),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".into(),
        service: "AI Vision Service".into(),
    })
}

async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "AI Vision Service API",
        "health_endpoint": "/api/health"
    }))
}

async fn api_not_found(req: HttpRequest) -> HttpResponse {
    warn!("No API route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(ErrorDetail::new("Not Found"))
}

async fn check_usage(
    user: AuthenticatedUser,
    usage: web::Data<UsageService>,
) -> Result<HttpResponse, ServiceError> {
    let user = user.0;
    let summary = usage.summary(&user.id, user.tier).await;
    info!(
        "Usage for {} ({}): {} / {}",
        user.id,
        user.tier,
        summary.analyses_used,
        summary.limit_label()
    );
    Ok(HttpResponse::Ok().json(summary))
}

async fn analyze_image(
    user: AuthenticatedUser,
    usage: web::Data<UsageService>,
    vision: web::Data<dyn VisionService>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let user = user.0;

    if !usage.has_capacity(&user.id, user.tier).await {
        warn!("Usage limit reached for {}", user.id);
        return Err(ServiceError::UsageLimitExceeded);
    }

    let image = read_image_field(payload).await.map_err(|e| {
        warn!("Rejected upload from {}: {}", user.id, e);
        e
    })?;

    // Another request may have taken the last slot while the body streamed in.
    if !usage.try_reserve(&user.id, user.tier).await {
        warn!("Usage limit reached for {}", user.id);
        return Err(ServiceError::UsageLimitExceeded);
    }

    match vision.describe(&image).await {
        Ok(description) => {
            info!("Analyzed {} for {}", image.filename, user.id);
            Ok(HttpResponse::Ok().json(AnalyzeResponse {
                description,
                success: true,
                user_id: Some(user.id),
                tier: Some(user.tier),
                filename: Some(image.filename),
            }))
        }
        Err(e) => {
            error!("Vision analysis failed for {}: {}", user.id, e);
            usage.release(&user.id, user.tier).await;
            Err(ServiceError::Vision(e))
        }
    }
}
