use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::str::FromStr;

use crate::domain::auth::{AuthClaims, AuthError, TokenVerifier};
use crate::infrastructure::config::JwtConfig;

/// HMAC-signed bearer tokens shared with the identity provider
pub struct JwtService {
  algorithm: Algorithm,
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  default_expiry_seconds: i64,
}

impl JwtService {
  /// Builds the service from configuration, resolving the secret once.
  ///
  /// # Errors
  /// * `AuthError::UnsupportedAlgorithm` - unknown or non-HMAC algorithm
  /// * secret resolution errors from `JwtConfig::resolve_secret`
  pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
    let algorithm = Algorithm::from_str(&config.algorithm)
      .map_err(|_| AuthError::UnsupportedAlgorithm(config.algorithm.clone()))?;
    if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
      return Err(AuthError::UnsupportedAlgorithm(config.algorithm.clone()));
    }

    let secret = config.resolve_secret()?;

    let mut validation = Validation::new(algorithm);
    validation.set_audience(&[config.audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "sub", "aud"]);
    validation.leeway = 0;

    Ok(Self {
      algorithm,
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      default_expiry_seconds: config.default_expiry_seconds,
    })
  }

  /// Issues a token for `claims`, expiring `expiry_seconds` from now
  /// (the configured default when `None`).
  pub fn sign(&self, claims: &AuthClaims, expiry_seconds: Option<i64>) -> Result<String, AuthError> {
    let mut claims = claims.clone();
    claims.exp = Utc::now().timestamp() + expiry_seconds.unwrap_or(self.default_expiry_seconds);

    encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
      .map_err(|e| AuthError::TokenCreation(e.to_string()))
  }
}

impl TokenVerifier for JwtService {
  fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
    decode::<AuthClaims>(token, &self.decoding_key, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AuthError::InvalidToken
      })
  }
}
