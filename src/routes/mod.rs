use actix_web::{web, HttpResponse};

use crate::error::ApiError;

pub mod messages;

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Payload(err.to_string()).into()),
    );
    // Only message routes take an id, and they only match integers.
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::NotFound(messages::MESSAGE_NOT_FOUND).into()),
    );

    messages::init(cfg);
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Not found"))
}
