//! Response envelope and error mapping
//!
//! Every JSON endpoint answers with `{"success", "data", "error", "fields"?}`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, FieldError};

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    pub error: Option<String>,
    /// Rejected input fields, present on validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            fields: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            fields: None,
        }
    }

    pub fn invalid(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            fields: Some(fields),
            ..Self::error(message)
        }
    }
}

/// Handler error: a domain error rendered as an enveloped HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        Self::status_of(&self.0)
    }

    pub fn status_of(error: &DomainError) -> StatusCode {
        match error {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) | DomainError::InvalidFields(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text shown to the caller
    pub fn message(&self) -> String {
        match &self.0 {
            DomainError::NotFound { entity, .. } => format!("{} not found", entity),
            DomainError::InvalidFields(_) => "Validation failed".to_string(),
            DomainError::Validation(m) | DomainError::Conflict(m) | DomainError::Unauthorized(m) => {
                m.clone()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        match self.0 {
            DomainError::InvalidFields(fields) => {
                (status, Json(ApiResponse::<()>::invalid(message, fields))).into_response()
            }
            DomainError::Unauthorized(_) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(ApiResponse::<()>::error(message)),
            )
                .into_response(),
            _ => (status, Json(ApiResponse::<()>::error(message))).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::not_found("Inspection", 3), StatusCode::NOT_FOUND),
            (DomainError::InvalidFields(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::Conflict("taken".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).status(), status);
        }
    }

    #[test]
    fn envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 5, "error": null}));

        let invalid = ApiResponse::<()>::invalid(
            "Validation failed",
            vec![FieldError::required("building_name")],
        );
        let value = serde_json::to_value(invalid).unwrap();
        assert_eq!(value["fields"][0]["field"], "building_name");
        assert_eq!(value["data"], serde_json::Value::Null);
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = ApiError(DomainError::Unauthorized("Could not validate credentials".into()))
            .into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn server_errors_echo_message() {
        let err = ApiError(DomainError::Database("disk full".into()));
        assert_eq!(err.message(), "Database error: disk full");
    }
}
