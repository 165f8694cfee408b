//! Request-level error taxonomy and its HTTP mapping.
//!
//! Provider failures never show up here: the responder falls through its
//! chain and always produces text. Rig failures are merged inline into the
//! chat reply. What remains is the small set of errors that abort a turn.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is required")]
    MissingMessage,
    #[error("language model API key is not configured")]
    ConfigMissing,
    #[error("rate limited, retry in {wait_secs}s")]
    RateLimited { wait_secs: u64 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ChatError::MissingMessage => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "message is required" }),
            ),
            ChatError::ConfigMissing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "API key not configured" }),
            ),
            ChatError::RateLimited { wait_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": format!("Too many requests, please wait {wait_secs}s"),
                    "isRateLimit": true,
                    "waitTime": wait_secs,
                }),
            ),
            // Internal detail goes to the log, never to the client.
            ChatError::Internal(e) => {
                error!("internal error while handling chat turn: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "error processing the message" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
