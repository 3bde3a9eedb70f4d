//! HTTP error mapping. Every error body is `{"detail": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fitola_core::FitolaError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error(transparent)]
    Fitola(#[from] FitolaError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_workflows: Option<Vec<String>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Fitola(e) => match e {
                FitolaError::UnknownWorkflow { .. } => StatusCode::BAD_REQUEST,
                FitolaError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                FitolaError::NotFound(_) => StatusCode::NOT_FOUND,
                FitolaError::GatewayStatus { status } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                FitolaError::GatewayTransport(_) | FitolaError::GatewayInvalidJson => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %detail, "request failed");
        } else {
            tracing::warn!(status = %status, error = %detail, "request rejected");
        }

        let available_workflows = match self {
            ApiError::Fitola(FitolaError::UnknownWorkflow { available, .. }) => Some(available),
            _ => None,
        };

        (
            status,
            Json(ErrorBody {
                detail,
                available_workflows,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(FitolaError::LlmNotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(FitolaError::GatewayStatus { status: 404 }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(FitolaError::GatewayInvalidJson).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(FitolaError::validation("age", "out of range")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::NotFound("Session not found".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_detail_text_is_bare_message() {
        let err = ApiError::from(FitolaError::GatewayNotConfigured);
        assert_eq!(
            err.to_string(),
            "RUBE_MCP_JWT is not configured. Please set RUBE_MCP_JWT."
        );
    }
}
