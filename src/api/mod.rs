use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::controller::SubmitError;
use crate::store::{StoreError, StoreErrorKind};
use crate::validation::FieldErrors;

pub mod attendance;
pub mod dashboard;
pub mod employee;

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Employee deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body for failed store calls.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Failed to load employees.")]
    pub message: String,
    #[schema(example = "transport")]
    pub kind: StoreErrorKind,
    #[schema(example = "list employees: connection refused")]
    pub details: String,
}

/// Error body for rejected forms.
#[derive(Serialize, ToSchema)]
pub struct ValidationBody {
    #[schema(example = "Validation failed")]
    pub message: String,
    pub errors: FieldErrors,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn store(context: &'static str, source: StoreError) -> Self {
        ApiError::Store { context, source }
    }

    pub fn submit(context: &'static str, err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(errors) => ApiError::Validation(errors),
            SubmitError::Store(source) => ApiError::Store { context, source },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { source, .. } => match source.kind {
                StoreErrorKind::Conflict => StatusCode::CONFLICT,
                StoreErrorKind::NotFound => StatusCode::NOT_FOUND,
                StoreErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                StoreErrorKind::Unauthorized
                | StoreErrorKind::Transport
                | StoreErrorKind::InvalidPayload
                | StoreErrorKind::Backend => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => HttpResponse::build(status).json(ValidationBody {
                message: "Validation failed".into(),
                errors: errors.clone(),
            }),
            ApiError::NotFound(message) => {
                HttpResponse::build(status).json(json!({ "message": message }))
            }
            ApiError::Store { context, source } => HttpResponse::build(status).json(ErrorBody {
                message: (*context).to_string(),
                kind: source.kind,
                details: source.message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kinds_map_to_http_statuses() {
        let cases = [
            (StoreErrorKind::Conflict, StatusCode::CONFLICT),
            (StoreErrorKind::NotFound, StatusCode::NOT_FOUND),
            (StoreErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
            (StoreErrorKind::Transport, StatusCode::BAD_GATEWAY),
            (StoreErrorKind::Unauthorized, StatusCode::BAD_GATEWAY),
        ];
        for (kind, status) in cases {
            let err = ApiError::store("Failed", StoreError::new(kind, "x"));
            assert_eq!(err.status_code(), status, "{kind}");
        }
    }

    #[test]
    fn submit_errors_keep_their_shape() {
        let mut errors = FieldErrors::default();
        errors.insert("date", "Pick a date");
        let err = ApiError::submit("Failed", SubmitError::Validation(errors));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
