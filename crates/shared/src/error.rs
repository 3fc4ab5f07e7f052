use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

impl ErrorCode {
    /// HTTP status the lookup endpoint answers with for this code.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::Validation => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, NO_RESULTS_MESSAGE)
    }

    /// Generic failure; the cause stays in the server log.
    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, INTERNAL_ERROR_MESSAGE)
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}

pub const NO_RESULTS_MESSAGE: &str = "No results found!";
pub const INTERNAL_ERROR_MESSAGE: &str = "Address lookup failed";
