// src/server/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A save could not be written; answered as `{success: false, error}`
    #[error("{0}")]
    WriteFailed(String),

    /// A tag file could not be read back; answered as `{error}`
    #[error("{0}")]
    ReadFailed(String),

    #[error("Cannot bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ServerError::MalformedPayload(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            ServerError::WriteFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            ServerError::ReadFailed(_) | ServerError::Bind { .. } | ServerError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_error_kinds_when_into_response_then_status_matches() {
        assert_eq!(
            ServerError::MalformedPayload("eof".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::WriteFailed("read-only".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::ReadFailed("missing".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
