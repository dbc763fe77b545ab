use super::entities::AuthClaims;
use super::errors::AuthError;

/// Verifies bearer tokens and extracts the caller's identity
pub trait TokenVerifier: Send + Sync {
  /// Decodes and validates `token`
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` when the signature, audience or expiry check fails
  fn verify(&self, token: &str) -> Result<AuthClaims, AuthError>;
}
