use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{OrderId, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
  pub food_id: Uuid,
  pub quantity: u32,
}

/// Collapses repeated food ids into one item with the summed quantity,
/// keeping the position of the first occurrence.
pub fn merge_food_items(items: impl IntoIterator<Item = FoodItem>) -> Vec<FoodItem> {
  let mut merged: Vec<FoodItem> = Vec::new();
  for item in items {
    match merged.iter_mut().find(|m| m.food_id == item.food_id) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
      None => merged.push(item),
    }
  }
  merged
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  pub vendor_id: Uuid,
  pub consumer_id: Uuid,
  pub foods: Vec<FoodItem>,
  pub total_price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn new(vendor_id: Uuid, consumer_id: Uuid, foods: Vec<FoodItem>, total_price: Decimal) -> Self {
    let now = Utc::now();
    Self {
      id: OrderId::generate(),
      vendor_id,
      consumer_id,
      foods,
      total_price,
      status: OrderStatus::Waiting,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn transition_to(&mut self, status: OrderStatus) -> Result<(), OrderError> {
    if !self.status.can_transition_to(status) {
      return Err(OrderError::InvalidStatusTransition {
        from: self.status,
        to: status,
      });
    }
    self.status = status;
    self.updated_at = Utc::now();
    Ok(())
  }
}
