use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Required fields are missing or empty (400).
    #[error("{0}")]
    Validation(&'static str),

    /// The request body is not the JSON shape the endpoint expects (400).
    #[error("{0}")]
    Payload(String),

    /// No row with the requested id (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// The database rejected a statement or the commit (400, raw error text).
    #[error("{0}")]
    Persistence(sqlx::Error),

    /// The database could not be reached at all (500, logged).
    #[error("Internal server error")]
    Unavailable(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(e),
            _ => Self::Persistence(e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Payload(_) | Self::Persistence(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Persistence(e) => error!("Persistence error: {}", e),
            Self::Unavailable(e) => error!("Database unavailable: {:?}", e),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
