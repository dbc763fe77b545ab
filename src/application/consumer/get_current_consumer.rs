use std::sync::Arc;
use uuid::Uuid;

use crate::domain::consumer::{Consumer, ConsumerError, ConsumerService};

#[derive(Debug, Clone)]
pub struct GetCurrentConsumerCommand {
  pub consumer_id: Uuid,
}

pub struct GetCurrentConsumerUseCase {
  consumer_service: Arc<ConsumerService>,
}

impl GetCurrentConsumerUseCase {
  pub fn new(consumer_service: Arc<ConsumerService>) -> Self {
    Self { consumer_service }
  }

  pub async fn execute(&self, command: GetCurrentConsumerCommand) -> Result<Consumer, ConsumerError> {
    self.consumer_service.get(command.consumer_id).await
  }
}
