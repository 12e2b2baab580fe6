use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::registration::value_objects::Password;

/// Request for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(length(
    min = 3,
    max = 50,
    message = "Username must be between 3 and 50 characters"
  ))]
  pub username: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  /// Plain text password, never echoed back
  #[validate(custom(function = "validate_password_strength"))]
  pub password: String,
}

/// Checks the same strength rules the domain enforces
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
  Password::new(password).map(|_| ()).map_err(|e| {
    let mut error = ValidationError::new("password_strength");
    error.message = Some(e.to_string().into());
    error
  })
}

/// Response after successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
  /// Unique identifier of the newly created account
  pub user_id: Uuid,
  pub username: String,
  pub email: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
      username: username.to_string(),
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  #[test]
  fn test_valid_request() {
    assert!(request("user", "user@email.com", "User1234").validate().is_ok());
  }

  #[test]
  fn test_username_length_bounds() {
    assert!(request("ab", "user@email.com", "User1234").validate().is_err());
    assert!(
      request(&"a".repeat(51), "user@email.com", "User1234")
        .validate()
        .is_err()
    );
    assert!(
      request(&"a".repeat(50), "user@email.com", "User1234")
        .validate()
        .is_ok()
    );
  }

  #[test]
  fn test_invalid_email() {
    let errors = request("user", "not-an-email", "User1234")
      .validate()
      .unwrap_err();

    assert!(errors.field_errors().contains_key("email"));
  }

  #[test]
  fn test_weak_password_reports_rule() {
    let errors = request("user", "user@email.com", "user1234")
      .validate()
      .unwrap_err();

    let field_errors = errors.field_errors();
    let password_errors = field_errors.get("password").unwrap();
    assert_eq!(
      password_errors[0].message.as_deref(),
      Some("Password must contain at least one uppercase letter")
    );
  }
}
