use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0} not found.")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl UsecaseError {
    pub fn comment_not_found() -> Self {
        UsecaseError::NotFound("Comment".to_string())
    }
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::comment_not_found(),
            RepositoryError::DatabaseError(msg) => UsecaseError::Internal(msg),
        }
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> Response {
        match &self {
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
                (StatusCode::BAD_REQUEST, Json(json!({ "message": self.to_string() }))).into_response()
            }
            UsecaseError::Validation(_) => {
                tracing::debug!(error = %self);
                (StatusCode::BAD_REQUEST, Json(json!({ "message": self.to_string() }))).into_response()
            }
            UsecaseError::Internal(_) => {
                // storage details stay in the log, the client gets a bare 500
                tracing::error!(error = %self, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(UsecaseError::comment_not_found().to_string(), "Comment not found.");
    }

    #[test]
    fn test_from_repository_error() {
        assert!(matches!(
            UsecaseError::from(RepositoryError::NotFound),
            UsecaseError::NotFound(_)
        ));
        assert!(matches!(
            UsecaseError::from(RepositoryError::DatabaseError("boom".to_string())),
            UsecaseError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn test_not_found_is_bad_request_with_message() {
        let response = UsecaseError::comment_not_found().into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"message":"Comment not found."}"#);
    }

    #[tokio::test]
    async fn test_validation_is_bad_request_with_message() {
        let response = UsecaseError::Validation("Comment text is required.".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"message":"Comment text is required."}"#);
    }

    #[tokio::test]
    async fn test_internal_is_opaque() {
        let response = UsecaseError::Internal("connection refused".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.is_empty());
    }
}
