use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::auth::auth_middleware;
use crate::models::mentorship::MentorshipRequestResponse;
use crate::services::mentorship_service::MentorshipService;
use crate::utils::Claims;

#[derive(Deserialize, ToSchema)]
pub struct CreateMentorshipRequest {
    pub alumni_id: String,
    pub topic: String,
    pub message: Option<String>,
}

fn parse_oid(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

#[utoipa::path(
    post,
    path = "/mentorship/requests",
    request_body = CreateMentorshipRequest,
    responses(
        (status = 201, description = "Mentorship request created", body = MentorshipRequestResponse),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_request(
    State(mentorship_service): State<Arc<MentorshipService>>,
    Extension(claims): Extension<Arc<Claims>>,
    Json(req): Json<CreateMentorshipRequest>,
) -> Result<(StatusCode, Json<MentorshipRequestResponse>), AppError> {
    let student_id = parse_oid(&claims.sub)?;
    let alumni_id = parse_oid(&req.alumni_id)?;

    let request = mentorship_service
        .create_request(student_id, alumni_id, req.topic, req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

#[utoipa::path(
    post,
    path = "/mentorship/requests/{id}/accept",
    params(
        ("id" = String, Path, description = "Mentorship request ID")
    ),
    responses(
        (status = 200, description = "Request accepted", body = MentorshipRequestResponse),
        (status = 404, description = "No pending request with this ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn accept_request(
    State(mentorship_service): State<Arc<MentorshipService>>,
    Extension(_claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_oid(&id)?;
    let request = mentorship_service.accept(request_id).await?;
    Ok(Json(request.into()))
}

#[utoipa::path(
    post,
    path = "/mentorship/requests/{id}/reject",
    params(
        ("id" = String, Path, description = "Mentorship request ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = MentorshipRequestResponse),
        (status = 404, description = "No pending request with this ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_request(
    State(mentorship_service): State<Arc<MentorshipService>>,
    Extension(_claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_oid(&id)?;
    let request = mentorship_service.reject(request_id).await?;
    Ok(Json(request.into()))
}

#[utoipa::path(
    post,
    path = "/mentorship/requests/{id}/complete",
    params(
        ("id" = String, Path, description = "Mentorship request ID")
    ),
    responses(
        (status = 200, description = "Session completed", body = MentorshipRequestResponse),
        (status = 404, description = "No accepted request with this ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn complete_request(
    State(mentorship_service): State<Arc<MentorshipService>>,
    Extension(_claims): Extension<Arc<Claims>>,
    Path(id): Path<String>,
) -> Result<Json<MentorshipRequestResponse>, AppError> {
    let request_id = parse_oid(&id)?;
    let request = mentorship_service.complete(request_id).await?;
    Ok(Json(request.into()))
}

pub fn mentorship_routes(mentorship_service: Arc<MentorshipService>) -> Router {
    Router::new()
        .route("/mentorship/requests", axum::routing::post(create_request))
        .route("/mentorship/requests/{id}/accept", axum::routing::post(accept_request))
        .route("/mentorship/requests/{id}/reject", axum::routing::post(reject_request))
        .route("/mentorship/requests/{id}/complete", axum::routing::post(complete_request))
        .layer(axum::middleware::from_fn(auth_middleware))
        .with_state(mentorship_service)
}
