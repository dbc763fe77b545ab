pub mod create_consumer;
pub mod get_current_consumer;
pub mod upgrade_consumer;

pub use create_consumer::{
  CreateAnonymousConsumerCommand, CreateAnonymousConsumerUseCase, CreateSignedConsumerCommand,
  CreateSignedConsumerUseCase,
};
pub use get_current_consumer::{GetCurrentConsumerCommand, GetCurrentConsumerUseCase};
pub use upgrade_consumer::{UpgradeConsumerCommand, UpgradeConsumerUseCase};
