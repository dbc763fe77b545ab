use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{Order, OrderError, OrderService};

#[derive(Debug, Clone)]
pub struct ConsumerOrdersCommand {
  pub consumer_id: Uuid,
}

pub struct ListConsumerOrdersUseCase {
  order_service: Arc<OrderService>,
}

impl ListConsumerOrdersUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: ConsumerOrdersCommand) -> Result<Vec<Order>, OrderError> {
    self.order_service.consumer_orders(command.consumer_id).await
  }
}
