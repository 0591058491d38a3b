mod auth;
mod config;
mod error;
mod routes;
mod upload;
mod usage;
mod vision;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use auth::jwt::JwtService;
use auth::middleware::AuthMiddleware;
use config::AppConfig;
use routes::{configure_api, configure_frontend};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use usage::usage_service::UsageService;
use vision::{OpenAiVision, VisionService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let vision = OpenAiVision::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.vision_model.clone(),
        Duration::from_secs(config.vision_timeout_secs),
    )
    .map_err(|e| {
        log::error!("Failed to build vision client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let vision: Arc<dyn VisionService> = Arc::new(vision);

    let usage_service = UsageService::new();
    let jwt_service = JwtService::new(&config.jwt_secret);
    let auth_middleware = AuthMiddleware::new(jwt_service);

    log::info!(
        "Vision model {} via {}",
        config.vision_model,
        config.openai_base_url
    );
    log::info!("Serving frontend from {}", config.frontend_dir);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    let frontend_dir = config.frontend_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::AUTHORIZATION,
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(usage_service.clone()))
            .app_data(web::Data::from(vision.clone()))
            .configure(|cfg| configure_api(cfg, auth_middleware.clone()))
            .configure(|cfg| configure_frontend(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
