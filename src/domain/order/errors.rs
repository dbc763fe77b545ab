use thiserror::Error;
use uuid::Uuid;

use super::value_objects::{OrderStatus, ValueObjectError};
use crate::domain::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Consumer does not exist")]
  ConsumerNotFound,

  #[error("Consumer account is disabled")]
  ConsumerDisabled,

  #[error("vendor does not exist")]
  VendorNotFound,

  /// The authenticated vendor has not registered yet
  #[error("Vendor not found")]
  VendorNotRegistered,

  #[error("Order must contain at least one food")]
  NoFoods,

  #[error("Invalid food with id: {0}")]
  InvalidFood(Uuid),

  #[error("Food {0} is not available")]
  FoodUnavailable(Uuid),

  #[error("Food prices don't match")]
  PriceMismatch,

  #[error("Order {0} not found")]
  OrderNotFound(String),

  #[error("Order cannot be canceled while {0}")]
  NotCancellable(OrderStatus),

  #[error("Order cannot move from {from} to {to}")]
  InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

  #[error("No queue exists for vendor {0}")]
  QueueMissing(Uuid),

  #[error("Queue is busy, please retry")]
  QueueContention,

  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}
