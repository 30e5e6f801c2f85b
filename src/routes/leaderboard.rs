use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::auth::auth_middleware;
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardEntryWithUser};
use crate::services::leaderboard_service::LeaderboardService;
use crate::utils::Claims;

const DEFAULT_LIMIT: i64 = 10;

#[derive(Deserialize)]
pub struct LimitQuery {
    limit: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct RatingRequest {
    pub value: i32,
}

fn parse_oid(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    params(
        ("limit" = Option<i64>, Query, description = "Number of entries to return, default 10")
    ),
    responses(
        (status = 200, description = "Top entries ordered by rank", body = [LeaderboardEntryWithUser])
    )
)]
pub async fn get_leaderboard(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntryWithUser>>, AppError> {
    let entries = leaderboard_service
        .top(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/leaderboard/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's leaderboard entry, created on first view", body = LeaderboardEntry),
        (status = 400, description = "Invalid user ID")
    )
)]
pub async fn get_user_entry(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Path(user_id): Path<String>,
) -> Result<Json<LeaderboardEntry>, AppError> {
    let user_id = parse_oid(&user_id)?;
    let entry = leaderboard_service.entry_for(user_id).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    get,
    path = "/leaderboard/top/{contribution}",
    params(
        ("contribution" = String, Path, description = "Contribution counter name, e.g. interview_experiences"),
        ("limit" = Option<i64>, Query, description = "Number of entries to return, default 10")
    ),
    responses(
        (status = 200, description = "Entries ordered by one contribution counter", body = [LeaderboardEntry]),
        (status = 400, description = "Unknown contribution type")
    )
)]
pub async fn top_by_contribution(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Path(contribution): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = leaderboard_service
        .top_by_contribution(&contribution, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/alumni/{alumni_id}/ratings",
    params(
        ("alumni_id" = String, Path, description = "Alumni user ID")
    ),
    request_body = RatingRequest,
    responses(
        (status = 201, description = "Rating recorded", body = LeaderboardEntry),
        (status = 400, description = "Rating out of range or invalid ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_rating(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Extension(_claims): Extension<Arc<Claims>>,
    Path(alumni_id): Path<String>,
    Json(req): Json<RatingRequest>,
) -> Result<(StatusCode, Json<LeaderboardEntry>), AppError> {
    let alumni_id = parse_oid(&alumni_id)?;
    leaderboard_service.add_rating(alumni_id, req.value).await?;
    let entry = leaderboard_service.entry_for(alumni_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub fn leaderboard_routes(leaderboard_service: Arc<LeaderboardService>) -> Router {
    let protected = Router::new()
        .route("/alumni/{alumni_id}/ratings", axum::routing::post(submit_rating))
        .layer(axum::middleware::from_fn(auth_middleware));

    Router::new()
        .route("/leaderboard", axum::routing::get(get_leaderboard))
        .route("/leaderboard/users/{user_id}", axum::routing::get(get_user_entry))
        .route("/leaderboard/top/{contribution}", axum::routing::get(top_by_contribution))
        .merge(protected)
        .with_state(leaderboard_service)
}
