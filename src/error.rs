// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

use reqwest::StatusCode;

/// Errors surfaced by the API client and state holders.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the backend answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
