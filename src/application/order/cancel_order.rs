use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{Order, OrderError, OrderId, OrderService};

#[derive(Debug, Clone)]
pub struct CancelOrderCommand {
  pub consumer_id: Uuid,
  pub order_id: String,
}

pub struct CancelOrderUseCase {
  order_service: Arc<OrderService>,
}

impl CancelOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  /// Cancels one of the caller's waiting orders
  ///
  /// # Errors
  /// * `OrderError::OrderNotFound` - malformed id, unknown order or someone else's order
  /// * `OrderError::NotCancellable` - the order already left the waiting state
  pub async fn execute(&self, command: CancelOrderCommand) -> Result<Order, OrderError> {
    let order_id =
      OrderId::parse(&command.order_id).map_err(|_| OrderError::OrderNotFound(command.order_id.clone()))?;

    self
      .order_service
      .cancel_order(command.consumer_id, &order_id)
      .await
  }
}
