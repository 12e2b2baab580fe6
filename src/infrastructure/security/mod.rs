mod jwt_token_issuer;
mod pbkdf2_hasher;

pub use jwt_token_issuer::{JwtTokenIssuer, VerificationClaims};
pub use pbkdf2_hasher::Pbkdf2PasswordHasher;
