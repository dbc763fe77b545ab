use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{FoodItem, Order, merge_food_items};
use super::errors::OrderError;
use super::ports::{ORDER_ID_CONSTRAINT, OrderRepository, QueueRepository};
use super::queue::{Queue, QueueWrite};
use super::value_objects::{OrderId, OrderStatus, ValueObjectError};
use crate::domain::consumer::ConsumerRepository;
use crate::domain::errors::RepositoryError;
use crate::domain::vendor::{FoodRepository, Price, VendorRepository};

/// Load-modify-save attempts before a queue write gives up
pub const MAX_QUEUE_WRITE_ATTEMPTS: usize = 3;

/// Order placement request
#[derive(Debug, Clone)]
pub struct PlaceOrder {
  pub consumer_id: Uuid,
  pub vendor_id: Uuid,
  pub foods: Vec<FoodItem>,
  pub total_price: Decimal,
}

/// Order lifecycle and the vendor queues that drive it.
///
/// Every queue mutation runs as a read-modify-write cycle against the
/// queue's version; a stale save is retried from a fresh read.
pub struct OrderService {
  order_repo: Arc<dyn OrderRepository>,
  queue_repo: Arc<dyn QueueRepository>,
  consumer_repo: Arc<dyn ConsumerRepository>,
  vendor_repo: Arc<dyn VendorRepository>,
  food_repo: Arc<dyn FoodRepository>,
}

enum SaveOutcome {
  Saved,
  Stale,
}

impl OrderService {
  pub fn new(
    order_repo: Arc<dyn OrderRepository>,
    queue_repo: Arc<dyn QueueRepository>,
    consumer_repo: Arc<dyn ConsumerRepository>,
    vendor_repo: Arc<dyn VendorRepository>,
    food_repo: Arc<dyn FoodRepository>,
  ) -> Self {
    Self {
      order_repo,
      queue_repo,
      consumer_repo,
      vendor_repo,
      food_repo,
    }
  }

  /// Validates and stores a new order, then appends it to the vendor's queue.
  ///
  /// # Arguments
  /// * `request` - The consumer, vendor, requested foods and the total the client computed
  ///
  /// # Returns
  /// The stored order with status `waiting`
  ///
  /// # Errors
  /// * `OrderError::ConsumerNotFound` / `OrderError::VendorNotFound` - unknown parties
  /// * `OrderError::InvalidFood` - a food id is not on the vendor's menu
  /// * `OrderError::FoodUnavailable` - a food is marked unavailable
  /// * `OrderError::PriceMismatch` - the client total differs from the menu prices
  pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrderError> {
    if request.foods.is_empty() {
      return Err(OrderError::NoFoods);
    }
    if request.foods.iter().any(|item| item.quantity < 1) {
      return Err(ValueObjectError::InvalidQuantity.into());
    }

    let consumer = self
      .consumer_repo
      .find_by_id(request.consumer_id)
      .await?
      .ok_or(OrderError::ConsumerNotFound)?;
    if consumer.is_disabled() {
      return Err(OrderError::ConsumerDisabled);
    }

    let vendor = self
      .vendor_repo
      .find_by_id(request.vendor_id)
      .await?
      .ok_or(OrderError::VendorNotFound)?;

    let items = merge_food_items(request.foods);
    let ids: Vec<Uuid> = items.iter().map(|item| item.food_id).collect();
    let foods = self.food_repo.find_many(vendor.id, &ids).await?;

    let mut total = Decimal::ZERO;
    for item in &items {
      let food = foods
        .iter()
        .find(|food| food.id == item.food_id)
        .ok_or(OrderError::InvalidFood(item.food_id))?;
      if !food.available {
        return Err(OrderError::FoodUnavailable(food.id));
      }
      total += food.price.times(item.quantity);
    }

    if total > Price::MAX_AMOUNT {
      return Err(ValueObjectError::TotalTooLarge(Price::MAX_AMOUNT).into());
    }
    if total != request.total_price {
      return Err(OrderError::PriceMismatch);
    }

    let mut order = Order::new(vendor.id, consumer.id(), items, total);
    for attempt in 1..=MAX_QUEUE_WRITE_ATTEMPTS {
      let mut queue = self.load_queue(vendor.id).await?;
      queue.enqueue(order.id.clone());

      let write = QueueWrite {
        new_order: Some(order.clone()),
        updated_orders: Vec::new(),
      };
      match self.queue_repo.save(&queue, write).await {
        Ok(_) => {
          tracing::info!(order_id = %order.id, queue = %queue.name, "Order placed");
          return Ok(order);
        }
        Err(RepositoryError::Conflict) => log_stale(&queue, attempt),
        // Two orders created within the same microsecond
        Err(e) if e.is_duplicate_of(ORDER_ID_CONSTRAINT) => order.id = OrderId::generate(),
        Err(e) => return Err(e.into()),
      }
    }

    Err(OrderError::QueueContention)
  }

  /// Cancels a waiting order owned by `consumer_id` and takes it off its queue
  pub async fn cancel_order(&self, consumer_id: Uuid, order_id: &OrderId) -> Result<Order, OrderError> {
    for attempt in 1..=MAX_QUEUE_WRITE_ATTEMPTS {
      let mut order = self
        .order_repo
        .find_by_id(order_id)
        .await?
        .filter(|order| order.consumer_id == consumer_id)
        .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
      if order.status != OrderStatus::Waiting {
        return Err(OrderError::NotCancellable(order.status));
      }

      let mut queue = self.load_queue(order.vendor_id).await?;
      queue.remove(&order.id);
      order.transition_to(OrderStatus::Canceled)?;

      let write = QueueWrite {
        new_order: None,
        updated_orders: vec![order.clone()],
      };
      if let SaveOutcome::Saved = self.save(&queue, write, attempt).await? {
        return Ok(order);
      }
    }

    Err(OrderError::QueueContention)
  }

  /// Starts the next waiting order.
  ///
  /// An order still being prepared is completed first. Returns the order now
  /// processing, or `None` when nothing is waiting, in which case no order is
  /// current afterwards.
  pub async fn next_order(&self, vendor_id: Uuid) -> Result<Option<Order>, OrderError> {
    self.ensure_vendor(vendor_id).await?;

    for attempt in 1..=MAX_QUEUE_WRITE_ATTEMPTS {
      let mut queue = self.load_queue(vendor_id).await?;
      let mut updated_orders = Vec::new();

      if let Some(previous) = queue.done() {
        updated_orders.extend(self.finish(&previous).await?);
      }

      let next = match queue.dequeue() {
        Some(id) => {
          let mut order = self
            .order_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))?;
          order.transition_to(OrderStatus::Processing)?;
          updated_orders.push(order.clone());
          Some(order)
        }
        None => None,
      };

      let write = QueueWrite {
        new_order: None,
        updated_orders,
      };
      if let SaveOutcome::Saved = self.save(&queue, write, attempt).await? {
        return Ok(next);
      }
    }

    Err(OrderError::QueueContention)
  }

  /// Completes the order being prepared. Returns `None` when there is none.
  pub async fn complete_current_order(&self, vendor_id: Uuid) -> Result<Option<Order>, OrderError> {
    self.ensure_vendor(vendor_id).await?;

    for attempt in 1..=MAX_QUEUE_WRITE_ATTEMPTS {
      let mut queue = self.load_queue(vendor_id).await?;
      let Some(current) = queue.done() else {
        return Ok(None);
      };

      let finished = self.finish(&current).await?;
      let write = QueueWrite {
        new_order: None,
        updated_orders: finished.iter().cloned().collect(),
      };
      if let SaveOutcome::Saved = self.save(&queue, write, attempt).await? {
        return match finished {
          Some(order) => Ok(Some(order)),
          None => Ok(self.order_repo.find_by_id(&current).await?),
        };
      }
    }

    Err(OrderError::QueueContention)
  }

  pub async fn vendor_orders(&self, vendor_id: Uuid) -> Result<Vec<Order>, OrderError> {
    self.ensure_vendor(vendor_id).await?;
    Ok(self.order_repo.find_by_vendor(vendor_id).await?)
  }

  pub async fn consumer_orders(&self, consumer_id: Uuid) -> Result<Vec<Order>, OrderError> {
    if self.consumer_repo.find_by_id(consumer_id).await?.is_none() {
      return Err(OrderError::ConsumerNotFound);
    }
    Ok(self.order_repo.find_by_consumer(consumer_id).await?)
  }

  async fn ensure_vendor(&self, vendor_id: Uuid) -> Result<(), OrderError> {
    match self.vendor_repo.find_by_id(vendor_id).await? {
      Some(_) => Ok(()),
      None => Err(OrderError::VendorNotRegistered),
    }
  }

  async fn load_queue(&self, vendor_id: Uuid) -> Result<Queue, OrderError> {
    self
      .queue_repo
      .find_by_vendor(vendor_id)
      .await?
      .ok_or(OrderError::QueueMissing(vendor_id))
  }

  /// Completed copy of a processing order; `None` if it is no longer processing
  async fn finish(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
    let Some(mut order) = self.order_repo.find_by_id(id).await? else {
      return Ok(None);
    };
    if order.status != OrderStatus::Processing {
      return Ok(None);
    }
    order.transition_to(OrderStatus::Completed)?;
    Ok(Some(order))
  }

  async fn save(&self, queue: &Queue, write: QueueWrite, attempt: usize) -> Result<SaveOutcome, OrderError> {
    match self.queue_repo.save(queue, write).await {
      Ok(_) => Ok(SaveOutcome::Saved),
      Err(RepositoryError::Conflict) => {
        log_stale(queue, attempt);
        Ok(SaveOutcome::Stale)
      }
      Err(e) => Err(e.into()),
    }
  }
}

fn log_stale(queue: &Queue, attempt: usize) {
  tracing::debug!(queue = %queue.name, attempt, "Queue changed since it was read, retrying");
}
