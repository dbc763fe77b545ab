use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{FoodItem, Order, OrderError, OrderService, PlaceOrder};

#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
  pub consumer_id: Uuid,
  pub vendor_id: Uuid,
  /// Food ids with quantities; repeated ids are merged
  pub foods: Vec<(Uuid, u32)>,
  /// Total the client computed from the menu
  pub total_price: Decimal,
}

pub struct PlaceOrderUseCase {
  order_service: Arc<OrderService>,
}

impl PlaceOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: PlaceOrderCommand) -> Result<Order, OrderError> {
    let foods = command
      .foods
      .into_iter()
      .map(|(food_id, quantity)| FoodItem { food_id, quantity })
      .collect();

    self
      .order_service
      .place_order(PlaceOrder {
        consumer_id: command.consumer_id,
        vendor_id: command.vendor_id,
        foods,
        total_price: command.total_price,
      })
      .await
  }
}
