use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ConsumerError;
use crate::domain::auth::Email;

/// Email and/or phone of a signed consumer; at least one is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
  email: Option<Email>,
  phone: Option<String>,
}

impl ContactDetails {
  pub fn new(email: Option<Email>, phone: Option<String>) -> Result<Self, ConsumerError> {
    let phone = phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    if email.is_none() && phone.is_none() {
      return Err(ConsumerError::MissingContact);
    }
    Ok(Self { email, phone })
  }

  pub fn email(&self) -> Option<&Email> {
    self.email.as_ref()
  }

  pub fn phone(&self) -> Option<&str> {
    self.phone.as_deref()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousConsumer {
  pub id: Uuid,
  pub disabled: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedConsumer {
  pub id: Uuid,
  pub contact: ContactDetails,
  pub disabled: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Someone who orders food. Anonymous consumers may later sign in with an
/// email or phone and keep their id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Consumer {
  Anonymous(AnonymousConsumer),
  Signed(SignedConsumer),
}

impl Consumer {
  pub fn anonymous(id: Uuid) -> Self {
    Consumer::Anonymous(AnonymousConsumer {
      id,
      disabled: false,
      created_at: Utc::now(),
    })
  }

  pub fn signed(id: Uuid, contact: ContactDetails) -> Self {
    let now = Utc::now();
    Consumer::Signed(SignedConsumer {
      id,
      contact,
      disabled: false,
      created_at: now,
      updated_at: now,
    })
  }

  pub fn id(&self) -> Uuid {
    match self {
      Consumer::Anonymous(c) => c.id,
      Consumer::Signed(c) => c.id,
    }
  }

  pub fn is_anonymous(&self) -> bool {
    matches!(self, Consumer::Anonymous(_))
  }

  pub fn is_disabled(&self) -> bool {
    match self {
      Consumer::Anonymous(c) => c.disabled,
      Consumer::Signed(c) => c.disabled,
    }
  }

  /// Turns an anonymous consumer into a signed one with the same id and creation time
  pub fn upgrade(self, contact: ContactDetails) -> Result<Self, ConsumerError> {
    match self {
      Consumer::Anonymous(anonymous) => Ok(Consumer::Signed(SignedConsumer {
        id: anonymous.id,
        contact,
        disabled: anonymous.disabled,
        created_at: anonymous.created_at,
        updated_at: Utc::now(),
      })),
      Consumer::Signed(_) => Err(ConsumerError::AlreadySigned),
    }
  }
}
