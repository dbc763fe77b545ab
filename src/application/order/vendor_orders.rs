use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{Order, OrderError, OrderService};

#[derive(Debug, Clone)]
pub struct VendorOrdersCommand {
  pub vendor_id: Uuid,
}

/// Every order placed with the caller's vendor, oldest first
pub struct ListVendorOrdersUseCase {
  order_service: Arc<OrderService>,
}

impl ListVendorOrdersUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: VendorOrdersCommand) -> Result<Vec<Order>, OrderError> {
    self.order_service.vendor_orders(command.vendor_id).await
  }
}

/// Starts preparing the oldest waiting order
pub struct NextOrderUseCase {
  order_service: Arc<OrderService>,
}

impl NextOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  /// The order now processing, or `None` when the queue is empty
  pub async fn execute(&self, command: VendorOrdersCommand) -> Result<Option<Order>, OrderError> {
    self.order_service.next_order(command.vendor_id).await
  }
}

pub struct CompleteCurrentOrderUseCase {
  order_service: Arc<OrderService>,
}

impl CompleteCurrentOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  /// The completed order, or `None` when nothing was being prepared
  pub async fn execute(&self, command: VendorOrdersCommand) -> Result<Option<Order>, OrderError> {
    self
      .order_service
      .complete_current_order(command.vendor_id)
      .await
  }
}
