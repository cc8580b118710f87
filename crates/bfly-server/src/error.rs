use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("not found")]
    NotFound,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("store error: {0}")]
    Store(#[from] bfly_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Clients only ever see a fixed message; the detail goes to the log.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::NotFound => "Not found",
            Self::InvalidBody(detail) => {
                tracing::warn!("rejected request body: {detail}");
                "Invalid request body"
            }
            other => {
                tracing::error!("request failed: {other}");
                "Internal server error"
            }
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
