use thiserror::Error;

/// Errors raised while authenticating a request or configuring token handling
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Not authenticated")]
  MissingCredentials,

  #[error("Invalid authentication scheme")]
  InvalidScheme,

  #[error("Invalid token or expired token.")]
  InvalidToken,

  #[error("Token subject is not a valid id: {0}")]
  InvalidSubject(String),

  #[error("JWT secret is not defined")]
  SecretUndefined,

  #[error("JWT secret file not found: {0}")]
  SecretFileNotFound(String),

  #[error("JWT secret file could not be read: {0}")]
  SecretFileUnreadable(String),

  #[error("Unsupported JWT algorithm: {0}")]
  UnsupportedAlgorithm(String),

  #[error("Token creation failed: {0}")]
  TokenCreation(String),
}
