use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::registration::errors::TokenError;
use crate::domain::registration::ports::TokenIssuer;
use crate::domain::registration::value_objects::{Email, VerificationToken};
use crate::infrastructure::config::JwtConfig;

/// Minimum HMAC secret length accepted for HS256
const MIN_SECRET_BYTES: usize = 32;

/// Claims carried by an email verification token
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationClaims {
  /// Account id
  pub sub: String,
  pub email: String,
  /// Unique per issued token
  pub jti: String,
  pub iss: String,
  pub aud: String,
  pub iat: i64,
  pub exp: i64,
}

/// HS256 signed JWT issuer for email verification links
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  issuer: String,
  audience: String,
  expiry: Duration,
}

impl JwtTokenIssuer {
  /// Creates a new issuer from the `jwt` config section
  ///
  /// # Errors
  /// Returns `TokenError::InvalidConfiguration` for a short secret, an empty issuer or
  /// audience, or an expiry that is not positive or does not fit a `Duration`.
  pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
    if config.secret.len() < MIN_SECRET_BYTES {
      return Err(TokenError::InvalidConfiguration(format!(
        "Secret must be at least {} bytes",
        MIN_SECRET_BYTES
      )));
    }
    if config.issuer.trim().is_empty() {
      return Err(TokenError::InvalidConfiguration(
        "Issuer must not be empty".to_string(),
      ));
    }
    if config.audience.trim().is_empty() {
      return Err(TokenError::InvalidConfiguration(
        "Audience must not be empty".to_string(),
      ));
    }
    if config.expiry_minutes <= 0 {
      return Err(TokenError::InvalidConfiguration(
        "Expiry must be a positive number of minutes".to_string(),
      ));
    }
    let expiry = Duration::try_minutes(config.expiry_minutes).ok_or_else(|| {
      TokenError::InvalidConfiguration(format!(
        "Expiry of {} minutes is out of range",
        config.expiry_minutes
      ))
    })?;

    Ok(Self {
      encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
      issuer: config.issuer.clone(),
      audience: config.audience.clone(),
      expiry,
    })
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn generate_verification_token(
    &self,
    account_id: Uuid,
    email: &Email,
  ) -> Result<VerificationToken, TokenError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(self.expiry).ok_or_else(|| {
      TokenError::SigningFailed("Token expiry overflows the calendar".to_string())
    })?;
    let claims = VerificationClaims {
      sub: account_id.to_string(),
      email: email.as_str().to_string(),
      jti: Uuid::new_v4().to_string(),
      iss: self.issuer.clone(),
      aud: self.audience.clone(),
      iat: now.timestamp(),
      exp: expires_at.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

    Ok(VerificationToken::new(token))
  }
}
