//! Error types for the Elidune administration console

use thiserror::Error;

/// A validation failure scoped to a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Login was rejected by the remote endpoint.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable access token and no refresh path; nothing was sent.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Token refresh failed. Session-fatal: both tokens are cleared and the
    /// session controller is notified before this error is returned.
    #[error("Session refresh failed")]
    RefreshFailed,

    /// Client-side schema rejection. Never reaches the network layer.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Remote 4xx/5xx; `message` is surfaced to the user verbatim.
    #[error("{message}")]
    ServerRejection { status: u16, message: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Token persistence failure.
    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// True when the error is fatal for the whole session rather than local
    /// to one operation.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, AppError::RefreshFailed | AppError::Unauthenticated)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        AppError::Validation(fields)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
