use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::application::registration::RegisterUserError;
use crate::domain::registration::errors::RegistrationError;

use super::dtos::ErrorResponse;

/// API error type that maps registration errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Malformed input (400 Bad Request)
  Validation(String),

  /// Username or email already registered (409 Conflict)
  Conflict { code: &'static str, message: String },

  /// Anything the client cannot fix (500 Internal Server Error)
  Internal { code: &'static str, detail: String },
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Conflict { code, message } => write!(f, "Conflict ({}): {}", code, message),
      ApiError::Internal { code, detail } => write!(f, "Internal error ({}): {}", code, detail),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict { .. } => StatusCode::CONFLICT,
      ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
      ApiError::Conflict { code, message } => (*code, message.clone()),
      ApiError::Internal { code, detail } => {
        // Don't expose internal error details to clients
        tracing::error!(code = *code, "Internal error: {}", detail);
        (*code, "An internal server error occurred".to_string())
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<RegistrationError> for ApiError {
  fn from(error: RegistrationError) -> Self {
    let code = error.code();
    match error {
      RegistrationError::IdentifierConflict { .. } => ApiError::Conflict {
        code,
        message: error.to_string(),
      },
      other => ApiError::Internal {
        code,
        detail: other.to_string(),
      },
    }
  }
}

impl From<RegisterUserError> for ApiError {
  fn from(error: RegisterUserError) -> Self {
    match error {
      RegisterUserError::Validation(err) => ApiError::Validation(err.to_string()),
      RegisterUserError::Registration(err) => err.into(),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    // HashMap order is unstable
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}
