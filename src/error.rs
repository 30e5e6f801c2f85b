use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("unknown activity tag: {0}")]
    UnknownActivity(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("malformed document: {0}")]
    Deserialize(#[from] bson::de::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] bson::ser::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidRating(_) | AppError::UnknownActivity(_) | AppError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Deserialize(_) | AppError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
