use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;
use zeroize::Zeroize;

use super::errors::ValidationError;

// ============================================================================
// Identifier Field
// ============================================================================

/// User-supplied identifier that must be globally unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierField {
  Username,
  Email,
}

impl IdentifierField {
  /// Stable discriminator reported when this identifier is already taken
  pub fn conflict_code(&self) -> &'static str {
    match self {
      IdentifierField::Username => "USERNAME_EXISTS",
      IdentifierField::Email => "EMAIL_EXISTS",
    }
  }
}

impl fmt::Display for IdentifierField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IdentifierField::Username => f.write_str("username"),
      IdentifierField::Email => f.write_str("email"),
    }
  }
}

// ============================================================================
// Username Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
  pub const MIN_LENGTH: usize = 3;
  pub const MAX_LENGTH: usize = 50;

  /// Creates a new Username after trimming and length validation
  pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
    let username = username.into().trim().to_string();
    let length = username.chars().count();

    if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
      return Err(ValidationError::UsernameLength {
        min: Self::MIN_LENGTH,
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(username))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into().trim().to_string();

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail);
    }

    // Normalize to lowercase so uniqueness is case-insensitive
    Ok(Self(email.to_lowercase()))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plaintext - Never Stored)
// ============================================================================

#[derive(Clone)]
pub struct Password(String);

impl Password {
  pub const MIN_LENGTH: usize = 8;
  pub const MAX_LENGTH: usize = 128;

  /// Creates a new Password after checking length and character classes
  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = Self(password.into());
    let length = password.0.chars().count();

    if length < Self::MIN_LENGTH {
      return Err(ValidationError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if length > Self::MAX_LENGTH {
      return Err(ValidationError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    if !password.0.chars().any(|c| c.is_ascii_uppercase()) {
      return Err(ValidationError::PasswordMissingUppercase);
    }

    if !password.0.chars().any(|c| c.is_ascii_lowercase()) {
      return Err(ValidationError::PasswordMissingLowercase);
    }

    if !password.0.chars().any(|c| c.is_ascii_digit()) {
      return Err(ValidationError::PasswordMissingDigit);
    }

    Ok(password)
  }

  /// Returns the plaintext (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

impl Drop for Password {
  fn drop(&mut self) {
    self.0.zeroize();
  }
}

// ============================================================================
// Credential Material
// ============================================================================

/// Random per-account salt mixed into the password derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordSalt([u8; PasswordSalt::LENGTH]);

impl PasswordSalt {
  pub const LENGTH: usize = 16;

  /// Draws a fresh salt from the operating system CSPRNG
  pub fn generate() -> Self {
    let mut bytes = [0u8; Self::LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    Self(bytes)
  }

  pub fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
    Self(bytes)
  }

  /// Rebuilds a salt read back from storage
  pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
    let bytes: [u8; Self::LENGTH] =
      bytes
        .try_into()
        .map_err(|_| ValidationError::InvalidSaltLength {
          expected: Self::LENGTH,
          actual: bytes.len(),
        })?;
    Ok(Self(bytes))
  }

  pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
    &self.0
  }
}

/// Base64-encoded derived key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  pub fn from_encoded(hash: impl Into<String>) -> Self {
    Self(hash.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// Output of a password derivation: the salt and the hash it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedCredential {
  pub salt: PasswordSalt,
  pub hash: PasswordHash,
}

// ============================================================================
// Verification Token
// ============================================================================

/// Signed, time-limited proof of control over an email address
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for VerificationToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("VerificationToken(***)")
  }
}
