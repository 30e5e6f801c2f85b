use axum::Router;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use utoipa::{openapi::{security::{HttpAuthScheme, HttpBuilder, SecurityScheme}, SecurityRequirement}, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::{
    leaderboard_service::LeaderboardService, mentorship_service::MentorshipService, scheduler,
};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health_check,
        routes::leaderboard::get_leaderboard,
        routes::leaderboard::get_user_entry,
        routes::leaderboard::top_by_contribution,
        routes::leaderboard::submit_rating,
        routes::mentorship::create_request,
        routes::mentorship::accept_request,
        routes::mentorship::reject_request,
        routes::mentorship::complete_request,
    ),
    components(
        schemas(
            models::leaderboard::LeaderboardEntry,
            models::leaderboard::LeaderboardEntryWithUser,
            models::leaderboard::Contributions,
            models::leaderboard::RatingStats,
            models::leaderboard::Streak,
            models::leaderboard::Level,
            models::leaderboard::Badge,
            models::leaderboard::Activity,
            models::mentorship::MentorshipRequestResponse,
            models::mentorship::RequestStatus,
            models::user::UserResponse,
            models::user::Role,
            routes::leaderboard::RatingRequest,
            routes::mentorship::CreateMentorshipRequest,
            utils::Claims,
        ),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

/// Injects a `bearer_auth` SecurityScheme and a global SecurityRequirement.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let comps = openapi.components.get_or_insert_with(Default::default);

        comps.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

        let sr = SecurityRequirement::new::<String, Vec<String>, String>(
            "bearer_auth".to_string(),
            Vec::<String>::new(),
        );
        openapi.security = Some(vec![sr]);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Arc::new(Config::from_env());
    let db = Arc::new(db::init_db(&config.mongodb_uri).await);

    let leaderboard_service = Arc::new(LeaderboardService::new(db.clone()));
    let mentorship_service = Arc::new(MentorshipService::new(db.clone(), leaderboard_service.clone()));

    scheduler::spawn_jobs(leaderboard_service.clone(), mentorship_service.clone());

    let app = Router::new()
        .merge(routes::init_routes(leaderboard_service, mentorship_service, config.clone()))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive());

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await.expect("failed to bind");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests;
