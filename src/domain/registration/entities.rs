use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{
  Email, HashedCredential, Password, PasswordHash, PasswordSalt, Username, VerificationToken,
};

/// Registration input that has already passed field-level validation
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
  pub username: Username,
  pub email: Email,
  pub password: Password,
}

/// Account persisted once per successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
  /// Unique identifier, assigned at construction
  pub id: Uuid,
  /// Globally unique username
  pub username: Username,
  /// Globally unique email address
  pub email: Email,
  /// Base64 PBKDF2 output
  pub password_hash: PasswordHash,
  /// Salt the hash was derived with
  pub password_salt: PasswordSalt,
  /// Token mailed to the user for email verification
  pub email_verification_token: Option<VerificationToken>,
  pub created_at: DateTime<Utc>,
}

impl UserAccount {
  /// Creates a new account with a fresh id and no verification token
  pub fn new(username: Username, email: Email, credential: HashedCredential) -> Self {
    Self {
      id: Uuid::new_v4(),
      username,
      email,
      password_hash: credential.hash,
      password_salt: credential.salt,
      email_verification_token: None,
      created_at: Utc::now(),
    }
  }

  /// Creates an account from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
    password_salt: PasswordSalt,
    email_verification_token: Option<VerificationToken>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      username,
      email,
      password_hash,
      password_salt,
      email_verification_token,
      created_at,
    }
  }

  /// Binds the verification token issued for this account
  pub fn attach_verification_token(&mut self, token: VerificationToken) {
    self.email_verification_token = Some(token);
  }
}
