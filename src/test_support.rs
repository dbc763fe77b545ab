//! In-memory port implementations for service and handler tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::domain::consumer::{Consumer, ConsumerRepository};
use crate::domain::errors::RepositoryError;
use crate::domain::order::{
  Order, OrderId, OrderRepository, Queue, QueueChange, QueueRepository, QueueWrite,
};
use crate::domain::vendor::{Food, FoodRepository, Vendor, VendorRepository, VendorStatus};

#[derive(Default)]
struct State {
  vendors: HashMap<Uuid, Vendor>,
  foods: Vec<Food>,
  consumers: HashMap<Uuid, Consumer>,
  orders: Vec<Order>,
  queues: HashMap<Uuid, Queue>,
}

impl State {
  fn with_menu(&self, mut vendor: Vendor) -> Vendor {
    vendor.menu = self
      .foods
      .iter()
      .filter(|f| f.vendor_id == vendor.id)
      .map(|f| f.id)
      .collect();
    vendor
  }
}

/// One store backing every repository port, mirroring the unique
/// constraints of the Postgres schema.
#[derive(Default)]
pub struct InMemoryStore {
  state: Mutex<State>,
  injected_conflicts: AtomicUsize,
  published: Mutex<Vec<QueueChange>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// The next `count` queue saves fail as if another writer got there first
  pub fn inject_queue_conflicts(&self, count: usize) {
    self.injected_conflicts.store(count, Ordering::SeqCst);
  }

  pub fn published_changes(&self) -> Vec<QueueChange> {
    self.published.lock().unwrap().clone()
  }

  pub fn queue_of(&self, vendor_id: Uuid) -> Queue {
    self.state.lock().unwrap().queues[&vendor_id].clone()
  }

  pub fn order(&self, id: &OrderId) -> Order {
    let state = self.state.lock().unwrap();
    state.orders.iter().find(|o| &o.id == id).cloned().unwrap()
  }

  pub fn insert_consumer(&self, consumer: Consumer) {
    self.state.lock().unwrap().consumers.insert(consumer.id(), consumer);
  }
}

#[async_trait]
impl VendorRepository for InMemoryStore {
  async fn create(&self, vendor: Vendor, menu: Vec<Food>, queue: Queue) -> Result<Vendor, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    if state.vendors.contains_key(&vendor.id) {
      return Err(RepositoryError::DuplicateKey("vendors_pkey".into()));
    }
    if state.vendors.values().any(|v| v.name == vendor.name) {
      return Err(RepositoryError::DuplicateKey("vendors_name_key".into()));
    }
    if vendor.email.is_some() && state.vendors.values().any(|v| v.email == vendor.email) {
      return Err(RepositoryError::DuplicateKey("vendors_email_key".into()));
    }
    state.vendors.insert(vendor.id, vendor.clone());
    state.foods.extend(menu);
    state.queues.insert(queue.vendor_id, queue);
    Ok(state.with_menu(vendor))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Vendor>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.vendors.get(&id).cloned().map(|v| state.with_menu(v)))
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<Vendor>, RepositoryError> {
    let state = self.state.lock().unwrap();
    let vendor = state.vendors.values().find(|v| v.name.as_str() == name).cloned();
    Ok(vendor.map(|v| state.with_menu(v)))
  }

  async fn update_status(&self, id: Uuid, status: VendorStatus) -> Result<Vendor, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    let vendor = state.vendors.get_mut(&id).ok_or(RepositoryError::NotFound)?;
    vendor.set_status(status);
    let vendor = vendor.clone();
    Ok(state.with_menu(vendor))
  }
}

#[async_trait]
impl FoodRepository for InMemoryStore {
  async fn create_many(&self, foods: Vec<Food>) -> Result<Vec<Food>, RepositoryError> {
    self.state.lock().unwrap().foods.extend(foods.clone());
    Ok(foods)
  }

  async fn find_by_id(&self, vendor_id: Uuid, food_id: Uuid) -> Result<Option<Food>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.foods.iter().find(|f| f.vendor_id == vendor_id && f.id == food_id).cloned())
  }

  async fn find_by_name(&self, vendor_id: Uuid, name: &str) -> Result<Option<Food>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .foods
        .iter()
        .find(|f| f.vendor_id == vendor_id && f.name.as_str() == name)
        .cloned(),
    )
  }

  async fn find_many(&self, vendor_id: Uuid, ids: &[Uuid]) -> Result<Vec<Food>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .foods
        .iter()
        .filter(|f| f.vendor_id == vendor_id && ids.contains(&f.id))
        .cloned()
        .collect(),
    )
  }

  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Food>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.foods.iter().filter(|f| f.vendor_id == vendor_id).cloned().collect())
  }

  async fn update(&self, food: Food) -> Result<Food, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    let stored = state
      .foods
      .iter_mut()
      .find(|f| f.id == food.id)
      .ok_or(RepositoryError::NotFound)?;
    *stored = food.clone();
    Ok(food)
  }

  async fn delete(&self, vendor_id: Uuid, food_id: Uuid) -> Result<bool, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    let before = state.foods.len();
    state.foods.retain(|f| !(f.vendor_id == vendor_id && f.id == food_id));
    Ok(state.foods.len() != before)
  }
}

#[async_trait]
impl ConsumerRepository for InMemoryStore {
  async fn create(&self, consumer: Consumer) -> Result<Consumer, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    if state.consumers.contains_key(&consumer.id()) {
      return Err(RepositoryError::DuplicateKey("consumers_pkey".into()));
    }
    if email_taken(&state, &consumer) {
      return Err(RepositoryError::DuplicateKey("consumers_email_key".into()));
    }
    state.consumers.insert(consumer.id(), consumer.clone());
    Ok(consumer)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Consumer>, RepositoryError> {
    Ok(self.state.lock().unwrap().consumers.get(&id).cloned())
  }

  async fn update(&self, consumer: Consumer) -> Result<Consumer, RepositoryError> {
    let mut state = self.state.lock().unwrap();
    if !state.consumers.contains_key(&consumer.id()) {
      return Err(RepositoryError::NotFound);
    }
    if email_taken(&state, &consumer) {
      return Err(RepositoryError::DuplicateKey("consumers_email_key".into()));
    }
    state.consumers.insert(consumer.id(), consumer.clone());
    Ok(consumer)
  }
}

fn email_of(consumer: &Consumer) -> Option<String> {
  match consumer {
    Consumer::Signed(signed) => signed.contact.email().map(|e| e.to_string()),
    Consumer::Anonymous(_) => None,
  }
}

fn email_taken(state: &State, consumer: &Consumer) -> bool {
  let Some(email) = email_of(consumer) else {
    return false;
  };
  state
    .consumers
    .values()
    .any(|c| c.id() != consumer.id() && email_of(c).as_deref() == Some(email.as_str()))
}

#[async_trait]
impl OrderRepository for InMemoryStore {
  async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.orders.iter().find(|o| &o.id == id).cloned())
  }

  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.orders.iter().filter(|o| o.vendor_id == vendor_id).cloned().collect())
  }

  async fn find_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
    let state = self.state.lock().unwrap();
    Ok(state.orders.iter().filter(|o| o.consumer_id == consumer_id).cloned().collect())
  }
}

#[async_trait]
impl QueueRepository for InMemoryStore {
  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Option<Queue>, RepositoryError> {
    Ok(self.state.lock().unwrap().queues.get(&vendor_id).cloned())
  }

  async fn save(&self, queue: &Queue, write: QueueWrite) -> Result<Queue, RepositoryError> {
    let injected = self.injected_conflicts.load(Ordering::SeqCst);
    if injected > 0 {
      self.injected_conflicts.store(injected - 1, Ordering::SeqCst);
      return Err(RepositoryError::Conflict);
    }

    let mut state = self.state.lock().unwrap();
    let stored_version = state
      .queues
      .get(&queue.vendor_id)
      .map(|q| q.version)
      .ok_or(RepositoryError::NotFound)?;
    if stored_version != queue.version {
      return Err(RepositoryError::Conflict);
    }

    if let Some(order) = write.new_order {
      if state.orders.iter().any(|o| o.id == order.id) {
        return Err(RepositoryError::DuplicateKey("orders_pkey".into()));
      }
      state.orders.push(order);
    }
    for order in write.updated_orders {
      if let Some(stored) = state.orders.iter_mut().find(|o| o.id == order.id) {
        *stored = order;
      }
    }

    let saved = Queue::restore(
      queue.id,
      queue.vendor_id,
      queue.name.clone(),
      queue.orders.iter().cloned().collect(),
      queue.current_order.clone(),
      queue.version + 1,
    );
    state.queues.insert(saved.vendor_id, saved.clone());
    if queue.orders_changed() {
      self.published.lock().unwrap().push(queue.change());
    }
    Ok(saved)
  }
}
