use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::db::StoreError;
use crate::services::ResolveError;

/// Body of every failed response. Details stay in the server log.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, something went wrong.";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(msg) => tracing::warn!("Not found: {}", msg),
            Self::DatabaseError(msg) => tracing::error!("Database error: {}", msg),
            Self::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
            }
            Self::ValidationError(msg) => tracing::warn!("Rejected request: {}", msg),
            Self::InternalError(msg) => tracing::error!("Internal error: {}", msg),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::ValidationError(err.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Store(e) => e.into(),
            ResolveError::NotFound(query) => Self::NotFound(format!("No results for '{query}'")),
            ResolveError::Upstream { service, message }
            | ResolveError::Normalization { service, message } => Self::ExternalApiError {
                service: service.to_string(),
                message,
            },
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
