use thiserror::Error;

use super::value_objects::IdentifierField;

/// Failure of a registration attempt
///
/// Every variant carries a stable discriminator (see [`RegistrationError::code`]) that
/// callers translate into client-facing responses.
#[derive(Debug, Error)]
pub enum RegistrationError {
  #[error("The {field} is already registered")]
  IdentifierConflict { field: IdentifierField },

  #[error("Persistence failure: {0}")]
  Persistence(#[from] RepositoryError),

  #[error("Notification failure: {0}")]
  Notification(#[from] NotificationError),

  #[error("Credential derivation failed: {0}")]
  Credential(#[from] HashError),

  #[error("Token issuance failed: {0}")]
  Token(#[from] TokenError),
}

impl RegistrationError {
  /// Machine-readable discriminator, stable across releases
  pub fn code(&self) -> &'static str {
    match self {
      RegistrationError::IdentifierConflict { field } => field.conflict_code(),
      RegistrationError::Persistence(_) => "PERSISTENCE_FAILURE",
      RegistrationError::Notification(_) => "NOTIFICATION_FAILURE",
      RegistrationError::Credential(_) | RegistrationError::Token(_) => "INTERNAL_FAILURE",
    }
  }

  pub fn is_conflict(&self) -> bool {
    matches!(self, RegistrationError::IdentifierConflict { .. })
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  /// A unique constraint on a user-supplied identifier rejected the insert
  #[error("Unique constraint violated on {field}")]
  UniqueViolation { field: IdentifierField },

  /// A unique constraint not tied to a known identifier
  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password derivation errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),
}

/// Verification token errors
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Invalid token issuer configuration: {0}")]
  InvalidConfiguration(String),

  #[error("Failed to sign token: {0}")]
  SigningFailed(String),
}

/// Verification email delivery errors
#[derive(Debug, Error)]
pub enum NotificationError {
  #[error("Invalid mail address: {0}")]
  InvalidAddress(String),

  #[error("Failed to render email: {0}")]
  Template(String),

  #[error("Failed to build message: {0}")]
  MessageBuild(String),

  #[error("Mail transport failed: {0}")]
  Transport(String),
}

/// Input validation errors, raised before a request reaches the registration core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Username must be between {min} and {max} characters")]
  UsernameLength { min: usize, max: usize },

  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Password too short, minimum {min} characters required")]
  PasswordTooShort { min: usize },

  #[error("Password too long, maximum {max} characters allowed")]
  PasswordTooLong { max: usize },

  #[error("Password must contain at least one uppercase letter")]
  PasswordMissingUppercase,

  #[error("Password must contain at least one lowercase letter")]
  PasswordMissingLowercase,

  #[error("Password must contain at least one digit")]
  PasswordMissingDigit,

  #[error("Salt must be {expected} bytes, got {actual}")]
  InvalidSaltLength { expected: usize, actual: usize },
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(io_err) => RepositoryError::ConnectionFailed(io_err.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}
