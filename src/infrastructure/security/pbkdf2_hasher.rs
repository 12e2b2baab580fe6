use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::registration::errors::HashError;
use crate::domain::registration::ports::PasswordHasher;
use crate::domain::registration::value_objects::{
  HashedCredential, Password, PasswordHash, PasswordSalt,
};

/// PBKDF2 password hasher
///
/// Uses HMAC-SHA-256 as the pseudorandom function with:
/// - Iterations: 100,000
/// - Derived key length: 32 bytes
/// - Salt: 16 random bytes from the OS CSPRNG
///
/// The derived key is stored as standard (padded) base64.
pub struct Pbkdf2PasswordHasher;

impl Pbkdf2PasswordHasher {
  pub const ITERATIONS: u32 = 100_000;
  pub const KEY_LENGTH: usize = 32;

  /// Creates a new instance of Pbkdf2PasswordHasher
  pub fn new() -> Self {
    Self
  }

  /// Derives the hash of `password` under a known salt
  ///
  /// Deterministic for a fixed (password, salt) pair.
  pub fn derive(password: &[u8], salt: &PasswordSalt) -> PasswordHash {
    let key = Self::derive_key(password, salt.as_bytes(), Self::ITERATIONS);
    PasswordHash::from_encoded(general_purpose::STANDARD.encode(key.as_slice()))
  }

  fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
  ) -> Zeroizing<[u8; Self::KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; Self::KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(password, salt, iterations, key.as_mut_slice());
    key
  }
}

impl Default for Pbkdf2PasswordHasher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
  /// Hashes a plaintext password under a freshly generated salt
  ///
  /// The derivation is CPU-bound, so it runs on the blocking pool instead of the
  /// async worker.
  async fn hash_password(&self, password: &Password) -> Result<HashedCredential, HashError> {
    let salt = PasswordSalt::generate();
    let plaintext = Zeroizing::new(password.as_str().as_bytes().to_vec());

    let hash = tokio::task::spawn_blocking(move || Pbkdf2PasswordHasher::derive(&plaintext, &salt))
      .await
      .map_err(|e| HashError::HashingFailed(format!("Derivation task failed: {}", e)))?;

    Ok(HashedCredential { salt, hash })
  }
}
