use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorDetail;

use crate::upload::UploadError;
use crate::vision::VisionError;

/// Every API failure is rendered as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Usage limit exceeded. Upgrade to Premium for unlimited analyses.")]
    UsageLimitExceeded,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Error analyzing image with OpenAI: {0}")]
    Vision(#[from] VisionError),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::UsageLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Upload(_) => StatusCode::BAD_REQUEST,
            ServiceError::Vision(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new(self.to_string()))
    }
}
