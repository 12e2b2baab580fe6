use std::sync::Arc;

use super::entities::{RegistrationRequest, UserAccount};
use super::errors::{RegistrationError, RepositoryError};
use super::ports::{AccountRepository, AccountTransaction, Notifier, PasswordHasher, TokenIssuer};
use super::value_objects::{IdentifierField, VerificationToken};

/// Registration orchestrator
///
/// Sequences the uniqueness checks, credential derivation, token issuance and the
/// transactional insert so that one call is one attempt with no partial writes.
pub struct RegistrationService {
  accounts: Arc<dyn AccountRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
  notifier: Arc<dyn Notifier>,
}

impl RegistrationService {
  /// Creates a new instance of RegistrationService
  pub fn new(
    accounts: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      accounts,
      password_hasher,
      token_issuer,
      notifier,
    }
  }

  /// Registers a new account and mails its verification link
  ///
  /// # Ordering
  /// Username check, then email check, then hashing, then the transaction. A conflict
  /// found by either check returns before anything is hashed or written.
  ///
  /// # Email delivery inside the transaction
  /// The verification email is sent after the insert but before the commit. If the
  /// send fails the insert is rolled back, so no unverifiable account is left behind.
  /// The reverse is not possible: once the mail server accepted the message it stays
  /// sent even if the commit then fails, so delivery is at-least-once and a user may
  /// receive a link for an account that does not exist.
  ///
  /// # Errors
  /// - `IdentifierConflict` if the username or email is taken, either by the
  ///   pre-checks or by the unique constraints at insert time
  /// - `Persistence` / `Notification` for storage, commit or mail failures, after
  ///   exactly one rollback attempt
  /// - `Credential` / `Token` if derivation or signing fails
  pub async fn register(
    &self,
    request: RegistrationRequest,
  ) -> Result<UserAccount, RegistrationError> {
    let RegistrationRequest {
      username,
      email,
      password,
    } = request;

    if self.accounts.username_exists(&username).await? {
      tracing::info!(username = %username, "Registration rejected, username taken");
      return Err(RegistrationError::IdentifierConflict {
        field: IdentifierField::Username,
      });
    }

    if self.accounts.email_exists(&email).await? {
      tracing::info!(email = %email, "Registration rejected, email taken");
      return Err(RegistrationError::IdentifierConflict {
        field: IdentifierField::Email,
      });
    }

    let credential = self.password_hasher.hash_password(&password).await?;
    drop(password);

    let mut account = UserAccount::new(username, email, credential);
    let token = self
      .token_issuer
      .generate_verification_token(account.id, &account.email)?;
    account.attach_verification_token(token.clone());

    let mut transaction = self.accounts.start_transaction().await?;

    let outcome = match self
      .insert_and_notify(transaction.as_mut(), &account, &token)
      .await
    {
      Ok(()) => transaction.commit().await.map_err(|error| {
        tracing::error!(
          account_id = %account.id,
          "Commit failed after the verification email was sent: {}",
          error
        );
        RegistrationError::Persistence(error)
      }),
      Err(error) => {
        tracing::warn!(
          account_id = %account.id,
          code = error.code(),
          "Registration failed inside transaction: {}",
          error
        );
        Err(error)
      }
    };

    if let Err(error) = outcome {
      if let Err(rollback_error) = transaction.rollback().await {
        tracing::error!(
          account_id = %account.id,
          "Transaction rollback failed: {}",
          rollback_error
        );
      }
      return Err(error);
    }

    tracing::info!(account_id = %account.id, username = %account.username, "Account registered");

    Ok(account)
  }

  async fn insert_and_notify(
    &self,
    transaction: &mut dyn AccountTransaction,
    account: &UserAccount,
    token: &VerificationToken,
  ) -> Result<(), RegistrationError> {
    // A constraint hit here means a concurrent registration won the race
    transaction
      .create_user(account)
      .await
      .map_err(|error| match error {
        RepositoryError::UniqueViolation { field } => {
          RegistrationError::IdentifierConflict { field }
        }
        other => RegistrationError::Persistence(other),
      })?;

    self
      .notifier
      .send_verification_email(&account.email, token)
      .await?;

    Ok(())
  }
}
