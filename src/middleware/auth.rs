use axum::{
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::Config;
use crate::utils::validate_jwt;

/// Middleware compatible with `middleware::from_fn`.
/// Reads `Authorization: Bearer <token>`, validates the JWT and inserts
/// `Arc<Claims>` into request extensions on success. The secret comes from
/// an `Arc<Config>` in the extensions, falling back to the `JWT_SECRET` env var.
pub async fn auth_middleware(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = match req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let jwt_secret = if let Some(cfg) = req.extensions().get::<Arc<Config>>() {
        cfg.jwt_secret.clone()
    } else if let Ok(s) = std::env::var("JWT_SECRET") {
        s
    } else {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    match validate_jwt(token, &jwt_secret) {
        Some(claims) => {
            req.extensions_mut().insert(Arc::new(claims));
            Ok(next.run(req).await)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
