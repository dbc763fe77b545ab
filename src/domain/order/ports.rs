use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Order;
use super::queue::{Queue, QueueChange, QueueWrite};
use super::value_objects::OrderId;
use crate::domain::errors::RepositoryError;

pub const ORDER_ID_CONSTRAINT: &str = "orders_pkey";

/// Read access to orders. Orders are written through `QueueRepository::save`
/// so that an order and its queue never disagree.
#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

  /// Oldest first
  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Order>, RepositoryError>;

  /// Oldest first
  async fn find_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
pub trait QueueRepository: Send + Sync {
  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Option<Queue>, RepositoryError>;

  /// Persists the queue and `write` atomically.
  ///
  /// # Errors
  /// `RepositoryError::Conflict` when the stored version no longer equals `queue.version`
  async fn save(&self, queue: &Queue, write: QueueWrite) -> Result<Queue, RepositoryError>;
}

/// Receives queue changes from the change stream
#[async_trait]
pub trait QueueChangeHandler: Send + Sync {
  async fn on_change(&self, change: QueueChange);
}
