use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::catalog::FieldErrors;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NetworkFailure(String),

    #[error("Please select a valid image file")]
    InvalidFileType,

    #[error("Image size should be less than {}MB", .limit / (1024 * 1024))]
    FileTooLarge { limit: usize },

    #[error("Failed to process image. Please try again.")]
    ImageProcessingFailed(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Failed to {action} product. Please try again.")]
    SubmissionFailed { action: SubmitAction, source: Box<CatalogError> },

    #[error("Product {0} not found")]
    NotFound(i64),

    #[error("Product {0} already exists")]
    DuplicateId(i64),

    #[error("Type 'delete' to confirm")]
    ConfirmationRequired,

    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Add,
    Update,
}

impl std::fmt::Display for SubmitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SubmitAction::Add => "add",
            SubmitAction::Update => "update",
        })
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CatalogError::NetworkFailure(format!("Remote store responded with {}", status)),
            None => CatalogError::NetworkFailure(err.to_string()),
        }
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            CatalogError::SubmissionFailed { source, .. } => source.status_code(),
            CatalogError::InvalidFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CatalogError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CatalogError::ImageProcessingFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Validation(_) | CatalogError::ConfirmationRequired => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Busy(_) | CatalogError::DuplicateId(_) => StatusCode::CONFLICT,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            CatalogError::Validation(errors) => json!({"message": self.to_string(), "errors": errors}),
            _ => json!({"message": self.to_string()}),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
