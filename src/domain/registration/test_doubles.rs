//! Recording test doubles for the registration ports
//!
//! Every double writes to a shared [`CallLog`] so tests can assert the exact order and
//! number of collaborator calls.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::entities::{RegistrationRequest, UserAccount};
use super::errors::{HashError, NotificationError, RepositoryError, TokenError};
use super::ports::{AccountRepository, AccountTransaction, Notifier, PasswordHasher, TokenIssuer};
use super::services::RegistrationService;
use super::value_objects::{
  Email, HashedCredential, IdentifierField, Password, PasswordHash, PasswordSalt, Username,
  VerificationToken,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  UsernameExists(String),
  EmailExists(String),
  HashPassword,
  IssueToken(Uuid, String),
  StartTransaction,
  CreateUser(Uuid),
  SendVerificationEmail(String, String),
  Commit,
  Rollback,
  DroppedUncommitted,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
  fn record(&self, call: Call) {
    self.0.lock().unwrap().push(call);
  }

  pub fn calls(&self) -> Vec<Call> {
    self.0.lock().unwrap().clone()
  }

  pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
    self.0.lock().unwrap().iter().filter(|c| predicate(c)).count()
  }
}

#[derive(Debug, Clone, Copy)]
pub enum InsertOutcome {
  Succeed,
  Fail,
  UniqueViolation(IdentifierField),
  DuplicateKey,
}

pub struct FakeRepository {
  log: CallLog,
  usernames: Vec<String>,
  emails: Vec<String>,
  insert_outcome: InsertOutcome,
  fail_lookups: bool,
  fail_commit: bool,
  fail_rollback: bool,
}

#[async_trait]
impl AccountRepository for FakeRepository {
  async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
    self.log.record(Call::UsernameExists(username.to_string()));
    if self.fail_lookups {
      return Err(RepositoryError::ConnectionFailed("connection refused".to_string()));
    }
    Ok(self.usernames.iter().any(|u| u == username.as_str()))
  }

  async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
    self.log.record(Call::EmailExists(email.to_string()));
    if self.fail_lookups {
      return Err(RepositoryError::ConnectionFailed("connection refused".to_string()));
    }
    Ok(self.emails.iter().any(|e| e == email.as_str()))
  }

  async fn start_transaction(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError> {
    self.log.record(Call::StartTransaction);
    Ok(Box::new(FakeTransaction {
      log: self.log.clone(),
      insert_outcome: self.insert_outcome,
      fail_commit: self.fail_commit,
      fail_rollback: self.fail_rollback,
      finished: false,
    }))
  }
}

pub struct FakeTransaction {
  log: CallLog,
  insert_outcome: InsertOutcome,
  fail_commit: bool,
  fail_rollback: bool,
  finished: bool,
}

#[async_trait]
impl AccountTransaction for FakeTransaction {
  async fn create_user(&mut self, account: &UserAccount) -> Result<(), RepositoryError> {
    self.log.record(Call::CreateUser(account.id));
    match self.insert_outcome {
      InsertOutcome::Succeed => Ok(()),
      InsertOutcome::Fail => Err(RepositoryError::QueryFailed("Database error".to_string())),
      InsertOutcome::UniqueViolation(field) => Err(RepositoryError::UniqueViolation { field }),
      InsertOutcome::DuplicateKey => Err(RepositoryError::DuplicateKey("users_pkey".to_string())),
    }
  }

  async fn commit(&mut self) -> Result<(), RepositoryError> {
    self.log.record(Call::Commit);
    if self.fail_commit {
      return Err(RepositoryError::TransactionFailed("commit aborted".to_string()));
    }
    self.finished = true;
    Ok(())
  }

  async fn rollback(&mut self) -> Result<(), RepositoryError> {
    self.finished = true;
    self.log.record(Call::Rollback);
    if self.fail_rollback {
      return Err(RepositoryError::TransactionFailed("rollback aborted".to_string()));
    }
    Ok(())
  }
}

impl Drop for FakeTransaction {
  fn drop(&mut self) {
    if !self.finished {
      self.log.record(Call::DroppedUncommitted);
    }
  }
}

pub struct FakeHasher {
  log: CallLog,
}

#[async_trait]
impl PasswordHasher for FakeHasher {
  async fn hash_password(&self, _password: &Password) -> Result<HashedCredential, HashError> {
    self.log.record(Call::HashPassword);
    Ok(Fixture::credential())
  }
}

pub struct FakeTokenIssuer {
  log: CallLog,
}

impl TokenIssuer for FakeTokenIssuer {
  fn generate_verification_token(
    &self,
    account_id: Uuid,
    email: &Email,
  ) -> Result<VerificationToken, TokenError> {
    self.log.record(Call::IssueToken(account_id, email.to_string()));
    Ok(VerificationToken::new(format!("token-{}", account_id)))
  }
}

pub struct FakeNotifier {
  log: CallLog,
  fail: bool,
  stall: bool,
}

#[async_trait]
impl Notifier for FakeNotifier {
  async fn send_verification_email(
    &self,
    address: &Email,
    token: &VerificationToken,
  ) -> Result<(), NotificationError> {
    self.log.record(Call::SendVerificationEmail(
      address.to_string(),
      token.as_str().to_string(),
    ));
    if self.stall {
      std::future::pending::<()>().await;
    }
    if self.fail {
      return Err(NotificationError::Transport("Email sending error".to_string()));
    }
    Ok(())
  }
}

/// Builder for a [`RegistrationService`] wired entirely with recording doubles
pub struct Fixture {
  pub log: CallLog,
  usernames: Vec<String>,
  emails: Vec<String>,
  insert_outcome: InsertOutcome,
  fail_lookups: bool,
  fail_commit: bool,
  fail_rollback: bool,
  fail_notifier: bool,
  stall_notifier: bool,
}

impl Fixture {
  pub fn new() -> Self {
    Self {
      log: CallLog::default(),
      usernames: Vec::new(),
      emails: Vec::new(),
      insert_outcome: InsertOutcome::Succeed,
      fail_lookups: false,
      fail_commit: false,
      fail_rollback: false,
      fail_notifier: false,
      stall_notifier: false,
    }
  }

  pub fn credential() -> HashedCredential {
    HashedCredential {
      salt: PasswordSalt::from_bytes([1u8; 16]),
      hash: PasswordHash::from_encoded("aGFzaGVkIHBhc3N3b3Jk"),
    }
  }

  pub fn with_existing_username(mut self, username: &str) -> Self {
    self.usernames.push(username.to_string());
    self
  }

  pub fn with_existing_email(mut self, email: &str) -> Self {
    self.emails.push(email.to_string());
    self
  }

  pub fn with_insert_outcome(mut self, outcome: InsertOutcome) -> Self {
    self.insert_outcome = outcome;
    self
  }

  pub fn with_failing_lookups(mut self) -> Self {
    self.fail_lookups = true;
    self
  }

  pub fn with_failing_commit(mut self) -> Self {
    self.fail_commit = true;
    self
  }

  pub fn with_failing_rollback(mut self) -> Self {
    self.fail_rollback = true;
    self
  }

  pub fn with_failing_notifier(mut self) -> Self {
    self.fail_notifier = true;
    self
  }

  /// Notifier whose send never completes
  pub fn with_stalled_notifier(mut self) -> Self {
    self.stall_notifier = true;
    self
  }

  pub fn repository(&self) -> Arc<FakeRepository> {
    Arc::new(FakeRepository {
      log: self.log.clone(),
      usernames: self.usernames.clone(),
      emails: self.emails.clone(),
      insert_outcome: self.insert_outcome,
      fail_lookups: self.fail_lookups,
      fail_commit: self.fail_commit,
      fail_rollback: self.fail_rollback,
    })
  }

  pub fn service(&self) -> RegistrationService {
    RegistrationService::new(
      self.repository(),
      Arc::new(FakeHasher {
        log: self.log.clone(),
      }),
      Arc::new(FakeTokenIssuer {
        log: self.log.clone(),
      }),
      Arc::new(FakeNotifier {
        log: self.log.clone(),
        fail: self.fail_notifier,
        stall: self.stall_notifier,
      }),
    )
  }

  pub fn request(&self) -> RegistrationRequest {
    RegistrationRequest {
      username: Username::new("user").unwrap(),
      email: Email::new("user@email.com").unwrap(),
      password: Password::new("User1234").unwrap(),
    }
  }
}
