//! API error type and its JSON rendering.
//!
//! Every failure leaves the API as `{"error": ..., "details": ...}` with a
//! status code matching its kind.

use crate::filter::FilterError;
use crate::store::StoreError;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input missing or malformed; raised before any store access.
    #[error("{error}")]
    Validation { error: String, details: String },

    /// A numeric filter did not parse under the strict policy.
    #[error("Invalid filter value")]
    InvalidFilter(#[from] FilterError),

    /// The record store failed.
    #[error("{source}")]
    Store {
        source: StoreError,
        details: &'static str,
    },

    /// No route matched the request.
    #[error("Not found")]
    NotFound { method: Method, path: String },
}

impl ApiError {
    /// Validation error with a short message and a hint.
    pub fn validation(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Validation {
            error: error.into(),
            details: details.into(),
        }
    }

    /// Store failure, with a description of the operation that failed.
    pub fn store(source: StoreError, details: &'static str) -> Self {
        Self::Store { source, details }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Response body for this error.
    pub fn body(&self) -> ErrorBody {
        let details = match self {
            Self::Validation { details, .. } => details.clone(),
            Self::InvalidFilter(inner) => inner.to_string(),
            Self::Store { details, .. } => details.to_string(),
            Self::NotFound { method, path } => format!("Route {} {} not found", method, path),
        };

        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();

        if status.is_server_error() {
            error!("{}: {}", body.details, body.error);
        } else {
            warn!("{} {}: {}", status.as_u16(), body.error, body.details);
        }

        (status, Json(body)).into_response()
    }
}
