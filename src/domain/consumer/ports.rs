use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Consumer;
use crate::domain::errors::RepositoryError;

pub const CONSUMER_ID_CONSTRAINT: &str = "consumers_pkey";
pub const CONSUMER_EMAIL_CONSTRAINT: &str = "consumers_email_key";

#[async_trait]
pub trait ConsumerRepository: Send + Sync {
  async fn create(&self, consumer: Consumer) -> Result<Consumer, RepositoryError>;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Consumer>, RepositoryError>;

  /// Replaces the stored consumer with the same id
  async fn update(&self, consumer: Consumer) -> Result<Consumer, RepositoryError>;
}
