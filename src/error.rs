//! # API Error Taxonomy
//!
//! Maps every request-path failure onto the gateway's wire format:
//!
//! - Validation failures → `400 { "error": … }`, detected before any I/O
//! - Share connectivity failures → `500 { "error": … }`, recoverable, never fatal
//! - Share I/O failures → `500 { "error": …, "detalle": … }` with the underlying
//!   message surfaced (clients are trusted internal callers)
//!
//! Fatal startup errors (port exhaustion, bind failures) live in
//! [`crate::net`] and propagate out of `main` instead of through here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use thiserror::Error;

/// JSON body returned for every photo-API failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalle: Option<String>,
}

/// Failure of a photo-API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request, rejected before touching the share.
    #[error("{0}")]
    Validation(String),

    /// The share is unreachable and the on-demand reconnect attempt failed.
    #[error("network share unreachable")]
    ShareUnavailable,

    /// A read/write/list operation against the share failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    detalle: None,
                },
            ),
            ApiError::ShareUnavailable => {
                error!("❌ Request failed: network share unreachable after reconnect attempt");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Error de conexión con el recurso de red".to_string(),
                        detalle: None,
                    },
                )
            }
            ApiError::Io { context, source } => {
                error!("❌ {}: {}", context, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: context,
                        detalle: Some(source.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
