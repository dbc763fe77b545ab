use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::Email;
use crate::domain::consumer::{Consumer, ConsumerError, ConsumerService};

#[derive(Debug, Clone)]
pub struct CreateAnonymousConsumerCommand {
  pub consumer_id: Uuid,
}

/// Registers an account that signed in without contact details
pub struct CreateAnonymousConsumerUseCase {
  consumer_service: Arc<ConsumerService>,
}

impl CreateAnonymousConsumerUseCase {
  pub fn new(consumer_service: Arc<ConsumerService>) -> Self {
    Self { consumer_service }
  }

  pub async fn execute(
    &self,
    command: CreateAnonymousConsumerCommand,
  ) -> Result<Consumer, ConsumerError> {
    self
      .consumer_service
      .create_anonymous(command.consumer_id)
      .await
  }
}

/// Contact details taken from the caller's token
#[derive(Debug, Clone)]
pub struct CreateSignedConsumerCommand {
  pub consumer_id: Uuid,
  pub email: Option<Email>,
  pub phone: Option<String>,
}

pub struct CreateSignedConsumerUseCase {
  consumer_service: Arc<ConsumerService>,
}

impl CreateSignedConsumerUseCase {
  pub fn new(consumer_service: Arc<ConsumerService>) -> Self {
    Self { consumer_service }
  }

  /// # Errors
  /// * `ConsumerError::MissingContact` - token carries neither email nor phone
  /// * `ConsumerError::AlreadyExists` - the account is already a consumer
  /// * `ConsumerError::EmailTaken` - the email belongs to another consumer
  pub async fn execute(&self, command: CreateSignedConsumerCommand) -> Result<Consumer, ConsumerError> {
    self
      .consumer_service
      .create_signed(command.consumer_id, command.email, command.phone)
      .await
  }
}
