pub mod consumer;
pub mod health;
pub mod order;
pub mod vendor;
pub mod websocket;

use uuid::Uuid;

use crate::{
  adapters::http::errors::ApiError,
  domain::auth::{AuthClaims, Email},
};

/// Account id of the caller
pub(crate) fn caller_id(claims: &AuthClaims) -> Result<Uuid, ApiError> {
  Ok(claims.subject_id()?)
}

/// Email claim of the caller; an empty claim counts as absent
pub(crate) fn claim_email(claims: &AuthClaims) -> Result<Option<Email>, ApiError> {
  let email = claims.email.trim();
  if email.is_empty() {
    return Ok(None);
  }
  Email::new(email)
    .map(Some)
    .map_err(|e| ApiError::Validation(e.to_string()))
}
