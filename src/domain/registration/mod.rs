pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod test_doubles;

// Re-export commonly used types
pub use entities::{RegistrationRequest, UserAccount};
pub use errors::{
  HashError, NotificationError, RegistrationError, RepositoryError, TokenError, ValidationError,
};
pub use ports::{AccountRepository, AccountTransaction, Notifier, PasswordHasher, TokenIssuer};
pub use services::RegistrationService;
pub use value_objects::{
  Email, HashedCredential, IdentifierField, Password, PasswordHash, PasswordSalt, Username,
  VerificationToken,
};
