//! Error kinds surfaced by the quiz core and the HTTP layer.
//!
//! An empty deck is not an error: it is the terminal
//! "no words remaining" state, not a failure.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
  /// Unsupported grading mode or gameplay option. Fatal, never retried.
  #[error("Configuration error: {0}")]
  Configuration(String),

  /// A component word and its combo word have no character in common.
  /// Points at a data-integrity problem in the vocabulary table.
  #[error("No shared character between component '{component}' and combo word '{combo}'")]
  NoSharedCharacter { component: String, combo: String },

  #[error("Unknown session: {0}")]
  UnknownSession(String),

  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Failed to read vocabulary file {path}: {source}")]
  VocabRead {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse vocabulary file {path}: {source}")]
  VocabParse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Serialize)]
struct ErrorResponse {
  error: String,
  message: String,
}

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    let (status, error_type) = match &self {
      QuizError::Configuration(_) => (StatusCode::BAD_REQUEST, "configuration_error"),
      QuizError::NoSharedCharacter { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "no_shared_character"),
      QuizError::UnknownSession(_) => (StatusCode::NOT_FOUND, "unknown_session"),
      QuizError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
      QuizError::VocabRead { .. } | QuizError::VocabParse { .. } => {
        (StatusCode::INTERNAL_SERVER_ERROR, "vocab_error")
      }
    };

    let body = Json(ErrorResponse {
      error: error_type.to_string(),
      message: self.to_string(),
    });

    (status, body).into_response()
  }
}
