//! # Scribe API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{
    App, Error, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::OriginGuard;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Scribe API Server on {}:{}{}",
        config.host,
        config.port,
        config.base_path
    );

    // The store is connected before the server accepts requests
    let state = AppState::new(&config).await?;
    let origins = OriginGuard::new(config.allowed_origins.clone());
    tracing::info!(
        allowed_origins = config.allowed_origins.len(),
        "Origin allow-list loaded"
    );

    let server_state = state.clone();
    let base_path = config.base_path.clone();
    HttpServer::new(move || build_app(server_state.clone(), origins.clone(), base_path.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    tracing::info!("HTTP server stopped");
    state.shutdown().await;
    Ok(())
}

/// The application with its middleware stack and routes.
///
/// Middleware runs outermost first: request logging, request IDs, then the
/// origin guard.
pub(crate) fn build_app(
    state: AppState,
    origins: OriginGuard,
    base_path: String,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(origins)
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        .configure(|cfg| handlers::configure_routes(cfg, &base_path))
        .default_service(web::to(handlers::not_found))
}
