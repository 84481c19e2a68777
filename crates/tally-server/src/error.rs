use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tally_engine::EngineError;
use tally_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    fn store_status(err: &StoreError) -> StatusCode {
        match err {
            StoreError::ReadOnly => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP status for this error.
    ///
    /// - Missing member, category, or item: 404
    /// - Duplicate member: 409
    /// - Empty name, unparseable date, undecodable body: 400
    /// - Read-only store: 403
    /// - Storage, configuration, and internal failures: 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Engine(e) => match e {
                EngineError::MemberNotFound(_)
                | EngineError::CategoryNotFound(_)
                | EngineError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
                EngineError::DuplicateMember(_) => StatusCode::CONFLICT,
                EngineError::EmptyName(_) | EngineError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                EngineError::Store(s) => Self::store_status(s),
                EngineError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(s) => Self::store_status(s),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures are logged in full but reported generically.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let not_found: ServerError = EngineError::MemberNotFound("x".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let dup: ServerError = EngineError::DuplicateMember("x".into()).into();
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);

        let empty: ServerError = EngineError::EmptyName("item").into();
        assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

        let ro: ServerError = EngineError::Store(StoreError::ReadOnly).into();
        assert_eq!(ro.status_code(), StatusCode::FORBIDDEN);

        let lock: ServerError = StoreError::Lock("poisoned".into()).into();
        assert_eq!(lock.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn server_errors_are_generic() {
        let err = ServerError::Internal("secret detail".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "internal server error"}));
        assert!(!String::from_utf8_lossy(&bytes).contains("secret detail"));
    }

    #[tokio::test]
    async fn client_errors_carry_message() {
        let response = ServerError::BadRequest("missing field `name`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("missing field `name`"));
    }
}
