use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::registration::{
  entities::UserAccount,
  errors::RepositoryError,
  ports::{AccountRepository, AccountTransaction},
  value_objects::{Email, IdentifierField, Username},
};

/// Unique constraint names created by the users migration
const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of the AccountRepository trait
pub struct PostgresAccountRepository {
  pool: PgPool,
}

impl PostgresAccountRepository {
  /// Creates a new instance of PostgresAccountRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
  async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
    let exists: bool =
      sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
      .bind(email.as_str())
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }

  async fn start_transaction(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError> {
    let transaction = self
      .pool
      .begin()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;

    Ok(Box::new(PostgresAccountTransaction {
      state: TransactionState::Open(transaction),
    }))
  }
}

enum TransactionState {
  Open(Transaction<'static, Postgres>),
  Committed,
  /// Connection returned to the pool; sqlx rolled back any open work on release
  Released,
}

/// Transaction on one pooled connection
///
/// sqlx rolls the transaction back when it is dropped without a commit, including when
/// a commit attempt fails.
pub struct PostgresAccountTransaction {
  state: TransactionState,
}

impl PostgresAccountTransaction {
  fn open(&mut self) -> Result<&mut Transaction<'static, Postgres>, RepositoryError> {
    match &mut self.state {
      TransactionState::Open(transaction) => Ok(transaction),
      TransactionState::Committed => Err(RepositoryError::TransactionFailed(
        "Transaction already committed".to_string(),
      )),
      TransactionState::Released => Err(RepositoryError::TransactionFailed(
        "Transaction already finished".to_string(),
      )),
    }
  }
}

#[async_trait]
impl AccountTransaction for PostgresAccountTransaction {
  async fn create_user(&mut self, account: &UserAccount) -> Result<(), RepositoryError> {
    let transaction = self.open()?;

    sqlx::query(
      r#"
            INSERT INTO users (
                id,
                username,
                email,
                password_hash,
                password_salt,
                email_verification_token,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
    )
    .bind(account.id)
    .bind(account.username.as_str())
    .bind(account.email.as_str())
    .bind(account.password_hash.as_str())
    .bind(account.password_salt.as_bytes().as_slice())
    .bind(account.email_verification_token.as_ref().map(|t| t.as_str()))
    .bind(account.created_at)
    .execute(&mut **transaction)
    .await
    .map_err(map_insert_error)?;

    Ok(())
  }

  async fn commit(&mut self) -> Result<(), RepositoryError> {
    let transaction = match std::mem::replace(&mut self.state, TransactionState::Released) {
      TransactionState::Open(transaction) => transaction,
      finished => {
        self.state = finished;
        return Err(RepositoryError::TransactionFailed(
          "Transaction already finished".to_string(),
        ));
      }
    };

    transaction
      .commit()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()))?;
    self.state = TransactionState::Committed;

    Ok(())
  }

  async fn rollback(&mut self) -> Result<(), RepositoryError> {
    match std::mem::replace(&mut self.state, TransactionState::Released) {
      TransactionState::Open(transaction) => transaction
        .rollback()
        .await
        .map_err(|e| RepositoryError::TransactionFailed(e.to_string())),
      TransactionState::Committed => {
        self.state = TransactionState::Committed;
        Err(RepositoryError::TransactionFailed(
          "Cannot roll back a committed transaction".to_string(),
        ))
      }
      // A failed commit dropped the sqlx transaction, which already rolled it back
      TransactionState::Released => Ok(()),
    }
  }
}

/// Maps a unique violation on a known identifier constraint to a conflict
fn map_insert_error(error: sqlx::Error) -> RepositoryError {
  if let sqlx::Error::Database(db_err) = &error {
    if db_err.is_unique_violation() {
      match db_err.constraint() {
        Some(USERNAME_CONSTRAINT) => {
          return RepositoryError::UniqueViolation {
            field: IdentifierField::Username,
          };
        }
        Some(EMAIL_CONSTRAINT) => {
          return RepositoryError::UniqueViolation {
            field: IdentifierField::Email,
          };
        }
        _ => {}
      }
    }
  }

  error.into()
}
