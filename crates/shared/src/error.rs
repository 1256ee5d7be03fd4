use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InputIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Internal,
}

/// Error body returned by the server and decoded by remote clients.
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

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }
}

impl From<InputIssue> for ApiError {
    fn from(value: InputIssue) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
