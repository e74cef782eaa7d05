use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ClientErrorBody, ServerErrorBody};

pub type AppResult<T> = Result<T, AppError>;

/// Which side of the request a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, reported with a plain message.
    Client,
    /// Extraction or upstream failure, reported with the full envelope.
    Server,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded.")]
    MissingFile,

    #[error("Invalid file type. Only PDFs are supported.")]
    InvalidFileType,

    #[error("PDF appears to be empty or not readable.")]
    EmptyDocument,

    #[error("File too large: exceeds limit of {limit} MB")]
    FileTooLarge { limit: usize },

    #[error("Failed to parse PDF: {message}")]
    PdfParse { message: String },

    #[error("Chat completion failed: {message}")]
    Completion { message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MISSING_FILE",
            AppError::InvalidFileType => "INVALID_FILE_TYPE",
            AppError::EmptyDocument => "EMPTY_DOCUMENT",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::PdfParse { .. } => "PDF_PARSE_ERROR",
            AppError::Completion { .. } => "COMPLETION_ERROR",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingFile
            | AppError::InvalidFileType
            | AppError::EmptyDocument
            | AppError::FileTooLarge { .. } => ErrorKind::Client,
            AppError::PdfParse { .. }
            | AppError::Completion { .. }
            | AppError::Timeout
            | AppError::Internal { .. } => ErrorKind::Server,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidFileType => StatusCode::BAD_REQUEST,
            AppError::EmptyDocument => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PdfParse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Completion { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        // The handler has already logged the failure with its stage
        tracing::debug!(
            error_code = self.error_code(),
            status_code = %status,
            "Rendering error response"
        );

        match self.kind() {
            ErrorKind::Client => (status, Json(ClientErrorBody::new(message))).into_response(),
            ErrorKind::Server => (status, Json(ServerErrorBody::new(message))).into_response(),
        }
    }
}

// Convert common errors to AppError
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Extraction task failed: {}", err),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::PdfParse {
            message: err.to_string(),
        }
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Completion {
            message: err.to_string(),
        }
    }
}

// For `ChatCompletion` implementations reporting upstream failures
impl AppError {
    pub fn completion(message: impl Into<String>) -> Self {
        AppError::Completion {
            message: message.into(),
        }
    }
}
