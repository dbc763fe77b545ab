use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::AuthError;
use super::value_objects::Email;

/// Identity carried by a verified bearer token.
///
/// Tokens are issued by the hosted identity provider; only `sub` and `exp`
/// are mandatory, every other claim falls back to its empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
  pub sub: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub is_anonymous: bool,
  #[serde(default)]
  pub user_metadata: Map<String, Value>,
  #[serde(default)]
  pub aud: String,
  pub exp: i64,
}

impl AuthClaims {
  /// The account id encoded in `sub`
  pub fn subject_id(&self) -> Result<Uuid, AuthError> {
    Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
  }

  /// The claim email when it is a well-formed address
  pub fn valid_email(&self) -> Option<Email> {
    Email::new(self.email.as_str()).ok()
  }

  /// The claim phone, `None` when empty
  pub fn phone(&self) -> Option<&str> {
    let phone = self.phone.trim();
    (!phone.is_empty()).then_some(phone)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claims(sub: &str, email: &str, phone: &str) -> AuthClaims {
    AuthClaims {
      sub: sub.to_string(),
      email: email.to_string(),
      phone: phone.to_string(),
      is_anonymous: false,
      user_metadata: Map::new(),
      aud: "authenticated".to_string(),
      exp: 0,
    }
  }

  #[test]
  fn test_subject_id_parses_uuid() {
    let id = Uuid::new_v4();
    assert_eq!(claims(&id.to_string(), "", "").subject_id().unwrap(), id);
  }

  #[test]
  fn test_subject_id_rejects_garbage() {
    let result = claims("user-1", "", "").subject_id();
    assert!(matches!(result, Err(AuthError::InvalidSubject(_))));
  }

  #[test]
  fn test_empty_contacts_are_absent() {
    let c = claims(&Uuid::new_v4().to_string(), "", "  ");
    assert!(c.valid_email().is_none());
    assert!(c.phone().is_none());
  }

  #[test]
  fn test_missing_optional_claims_default() {
    let json = r#"{"sub":"abc","exp":1700000000}"#;
    let c: AuthClaims = serde_json::from_str(json).unwrap();
    assert_eq!(c.email, "");
    assert!(!c.is_anonymous);
    assert!(c.user_metadata.is_empty());
  }
}
