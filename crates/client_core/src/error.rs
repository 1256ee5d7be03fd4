use shared::{
    domain::InputIssue,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

/// Failure reported by a [`crate::SubmissionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("rejected by store: {0}")]
    ValidationRejected(String),
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable(_) => {
                "Não foi possível carregar os dados. Tente novamente.".to_string()
            }
            Self::ValidationRejected(message) => message.clone(),
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(value: ApiError) -> Self {
        match value.code {
            ErrorCode::Validation => Self::ValidationRejected(value.message),
            ErrorCode::Internal => Self::Unavailable(value.message),
        }
    }
}

/// The form's `lastError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("first and last name are required")]
    MissingName,
    #[error("no availability date selected")]
    NoDatesSelected,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("rejected by store: {0}")]
    ValidationRejected(String),
}

impl FormError {
    /// Text shown under the form. Store rejections are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingName => "Nome e sobrenome são obrigatórios.".to_string(),
            Self::NoDatesSelected => {
                "Selecione ao menos uma data de disponibilidade.".to_string()
            }
            Self::StoreUnavailable(_) => {
                "Não foi possível salvar. Seus dados foram mantidos; tente novamente.".to_string()
            }
            Self::ValidationRejected(message) => message.clone(),
        }
    }
}

impl From<StoreError> for FormError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(message) => Self::StoreUnavailable(message),
            StoreError::ValidationRejected(message) => Self::ValidationRejected(message),
        }
    }
}

impl From<InputIssue> for FormError {
    fn from(value: InputIssue) -> Self {
        match value {
            InputIssue::MissingName => Self::MissingName,
            InputIssue::NoDatesSelected => Self::NoDatesSelected,
            issue @ InputIssue::OutsideMonth { .. } => Self::ValidationRejected(issue.to_string()),
        }
    }
}
