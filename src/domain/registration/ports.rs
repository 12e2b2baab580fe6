use async_trait::async_trait;
use uuid::Uuid;

use super::entities::UserAccount;
use super::errors::{HashError, NotificationError, RepositoryError, TokenError};
use super::value_objects::{Email, HashedCredential, Password, Username, VerificationToken};

/// Repository trait for account uniqueness queries and transactional writes
#[async_trait]
pub trait AccountRepository: Send + Sync {
  /// Returns true if an account with this username exists
  async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError>;

  /// Returns true if an account with this email exists
  async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

  /// Opens a unit of work; the returned handle is owned by exactly one caller
  async fn start_transaction(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError>;
}

/// Scoped transaction handle
///
/// Dropping a handle that was neither committed nor rolled back discards its writes.
/// The handle outlives a failed commit so the caller can still roll it back.
#[async_trait]
pub trait AccountTransaction: Send {
  /// Inserts the account
  ///
  /// Fails with [`RepositoryError::UniqueViolation`] if the username or email was taken
  /// by a concurrent registration after the existence checks.
  async fn create_user(&mut self, account: &UserAccount) -> Result<(), RepositoryError>;

  /// Makes the transaction's writes visible
  async fn commit(&mut self) -> Result<(), RepositoryError>;

  /// Discards the transaction's writes
  ///
  /// Fails if the transaction was already committed.
  async fn rollback(&mut self) -> Result<(), RepositoryError>;
}

/// Service trait for password derivation
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Derives a salt and hash from a plaintext password
  async fn hash_password(&self, password: &Password) -> Result<HashedCredential, HashError>;
}

/// Service trait for issuing email verification tokens
pub trait TokenIssuer: Send + Sync {
  /// Issues a signed, time-limited token bound to one account and address
  fn generate_verification_token(
    &self,
    account_id: Uuid,
    email: &Email,
  ) -> Result<VerificationToken, TokenError>;
}

/// Outbound notification capability
#[async_trait]
pub trait Notifier: Send + Sync {
  /// Sends the verification email containing the token link
  async fn send_verification_email(
    &self,
    address: &Email,
    token: &VerificationToken,
  ) -> Result<(), NotificationError>;
}
