use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::Email;
use crate::domain::consumer::{Consumer, ConsumerError, ConsumerService};

#[derive(Debug, Clone)]
pub struct UpgradeConsumerCommand {
  pub consumer_id: Uuid,
  pub email: Option<Email>,
  pub phone: Option<String>,
}

/// Turns an anonymous consumer into a signed one after the account adds contact details
pub struct UpgradeConsumerUseCase {
  consumer_service: Arc<ConsumerService>,
}

impl UpgradeConsumerUseCase {
  pub fn new(consumer_service: Arc<ConsumerService>) -> Self {
    Self { consumer_service }
  }

  pub async fn execute(&self, command: UpgradeConsumerCommand) -> Result<Consumer, ConsumerError> {
    self
      .consumer_service
      .upgrade(command.consumer_id, command.email, command.phone)
      .await
  }
}
