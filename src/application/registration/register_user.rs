use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::registration::errors::{RegistrationError, ValidationError};
use crate::domain::registration::services::RegistrationService;
use crate::domain::registration::value_objects::{Email, Password, Username};
use crate::domain::registration::RegistrationRequest;

/// Command for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// Desired username
  pub username: String,
  /// Email address the verification link is sent to
  pub email: String,
  /// Plain text password, hashed before storage
  pub password: String,
}

/// Response after successful registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created account
  pub user_id: Uuid,
  pub username: String,
  pub email: String,
}

/// Errors surfaced by the register use case
#[derive(Debug, Error)]
pub enum RegisterUserError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Registration(#[from] RegistrationError),
}

/// Use case for registering a new account
pub struct RegisterUserUseCase {
  registration_service: Arc<RegistrationService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(registration_service: Arc<RegistrationService>) -> Self {
    Self {
      registration_service,
    }
  }

  /// Executes the registration use case
  ///
  /// # Errors
  /// Returns `RegisterUserError::Validation` if a field is malformed, before any
  /// repository call, or the service's `RegistrationError` otherwise.
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, RegisterUserError> {
    let request = RegistrationRequest {
      username: Username::new(command.username)?,
      email: Email::new(command.email)?,
      password: Password::new(command.password)?,
    };

    let account = self.registration_service.register(request).await?;

    Ok(RegisterUserResponse {
      user_id: account.id,
      username: account.username.into_inner(),
      email: account.email.into_inner(),
    })
  }
}
