use axum::{Extension, Router, routing::get};
use std::sync::Arc;

use crate::config::Config;
use crate::services::{leaderboard_service::LeaderboardService, mentorship_service::MentorshipService};

pub mod leaderboard;
pub mod mentorship;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

pub fn init_routes(
    leaderboard_service: Arc<LeaderboardService>,
    mentorship_service: Arc<MentorshipService>,
    config: Arc<Config>,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(leaderboard::leaderboard_routes(leaderboard_service))
        .merge(mentorship::mentorship_routes(mentorship_service))
        .layer(Extension(config))
}
