use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Consumer, ContactDetails};
use super::errors::ConsumerError;
use super::ports::{CONSUMER_EMAIL_CONSTRAINT, CONSUMER_ID_CONSTRAINT, ConsumerRepository};
use crate::domain::auth::Email;
use crate::domain::errors::RepositoryError;

pub struct ConsumerService {
  consumer_repo: Arc<dyn ConsumerRepository>,
}

impl ConsumerService {
  pub fn new(consumer_repo: Arc<dyn ConsumerRepository>) -> Self {
    Self { consumer_repo }
  }

  pub async fn get(&self, id: Uuid) -> Result<Consumer, ConsumerError> {
    self
      .consumer_repo
      .find_by_id(id)
      .await?
      .ok_or(ConsumerError::NotFound)
  }

  pub async fn create_anonymous(&self, id: Uuid) -> Result<Consumer, ConsumerError> {
    self.create(Consumer::anonymous(id)).await
  }

  /// Creates a consumer that signed in with an email and/or phone
  ///
  /// # Errors
  /// * `ConsumerError::MissingContact` - neither email nor phone given
  /// * `ConsumerError::AlreadyExists` - a consumer with this id exists
  /// * `ConsumerError::EmailTaken` - another consumer uses the email
  pub async fn create_signed(
    &self,
    id: Uuid,
    email: Option<Email>,
    phone: Option<String>,
  ) -> Result<Consumer, ConsumerError> {
    let contact = ContactDetails::new(email, phone)?;
    self.create(Consumer::signed(id, contact)).await
  }

  /// Converts an anonymous consumer into a signed one, keeping its id and orders
  pub async fn upgrade(
    &self,
    id: Uuid,
    email: Option<Email>,
    phone: Option<String>,
  ) -> Result<Consumer, ConsumerError> {
    let contact = ContactDetails::new(email, phone)?;
    let consumer = self.get(id).await?.upgrade(contact)?;

    self
      .consumer_repo
      .update(consumer)
      .await
      .map_err(map_duplicate)
  }

  async fn create(&self, consumer: Consumer) -> Result<Consumer, ConsumerError> {
    if self.consumer_repo.find_by_id(consumer.id()).await?.is_some() {
      return Err(ConsumerError::AlreadyExists);
    }

    self
      .consumer_repo
      .create(consumer)
      .await
      .map_err(map_duplicate)
  }
}

fn map_duplicate(error: RepositoryError) -> ConsumerError {
  if error.is_duplicate_of(CONSUMER_ID_CONSTRAINT) {
    ConsumerError::AlreadyExists
  } else if error.is_duplicate_of(CONSUMER_EMAIL_CONSTRAINT) {
    ConsumerError::EmailTaken
  } else {
    ConsumerError::Repository(error)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::InMemoryStore;

  fn service() -> ConsumerService {
    ConsumerService::new(Arc::new(InMemoryStore::new()))
  }

  fn email(value: &str) -> Option<Email> {
    Some(Email::new(value).unwrap())
  }

  #[tokio::test]
  async fn test_create_anonymous_then_get() {
    let service = service();
    let id = Uuid::new_v4();

    service.create_anonymous(id).await.unwrap();
    let consumer = service.get(id).await.unwrap();
    assert!(consumer.is_anonymous());
    assert!(!consumer.is_disabled());
  }

  #[tokio::test]
  async fn test_create_twice_fails() {
    let service = service();
    let id = Uuid::new_v4();
    service.create_anonymous(id).await.unwrap();

    let result = service.create_signed(id, email("a@b.co"), None).await;
    assert!(matches!(result, Err(ConsumerError::AlreadyExists)));
  }

  #[tokio::test]
  async fn test_signed_requires_contact() {
    let result = service().create_signed(Uuid::new_v4(), None, Some(String::new())).await;
    assert!(matches!(result, Err(ConsumerError::MissingContact)));
  }

  #[tokio::test]
  async fn test_signed_email_is_unique() {
    let service = service();
    service.create_signed(Uuid::new_v4(), email("a@b.co"), None).await.unwrap();

    let result = service.create_signed(Uuid::new_v4(), email("A@b.co"), None).await;
    assert!(matches!(result, Err(ConsumerError::EmailTaken)));
  }

  #[tokio::test]
  async fn test_get_missing_consumer() {
    assert!(matches!(service().get(Uuid::new_v4()).await, Err(ConsumerError::NotFound)));
  }

  #[tokio::test]
  async fn test_upgrade_anonymous_consumer() {
    let service = service();
    let id = Uuid::new_v4();
    service.create_anonymous(id).await.unwrap();

    let upgraded = service.upgrade(id, None, Some("0712345678".into())).await.unwrap();
    assert!(!upgraded.is_anonymous());
    assert!(!service.get(id).await.unwrap().is_anonymous());

    let again = service.upgrade(id, email("a@b.co"), None).await;
    assert!(matches!(again, Err(ConsumerError::AlreadySigned)));
  }
}
