use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use super::entities::Order;
use super::value_objects::OrderId;

/// A vendor's order queue.
///
/// `orders` holds waiting orders oldest first; `current_order` is the one
/// being prepared. `version` is compared on save so concurrent
/// read-modify-write cycles cannot overwrite each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
  pub id: Uuid,
  pub vendor_id: Uuid,
  pub name: String,
  pub orders: VecDeque<OrderId>,
  pub current_order: Option<OrderId>,
  pub version: i64,
  orders_changed: bool,
}

impl Queue {
  pub fn new(vendor_id: Uuid, name: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      vendor_id,
      name: name.into(),
      orders: VecDeque::new(),
      current_order: None,
      version: 0,
      orders_changed: false,
    }
  }

  /// Rebuilds a queue from storage
  pub fn restore(
    id: Uuid,
    vendor_id: Uuid,
    name: String,
    orders: Vec<OrderId>,
    current_order: Option<OrderId>,
    version: i64,
  ) -> Self {
    Self {
      id,
      vendor_id,
      name,
      orders: orders.into(),
      current_order,
      version,
      orders_changed: false,
    }
  }

  pub fn enqueue(&mut self, order_id: OrderId) {
    self.orders.push_back(order_id);
    self.orders_changed = true;
  }

  /// Moves the oldest waiting order into `current_order` and returns it.
  /// An empty queue clears `current_order` and returns `None`.
  pub fn dequeue(&mut self) -> Option<OrderId> {
    self.current_order = self.orders.pop_front();
    if self.current_order.is_some() {
      self.orders_changed = true;
    }
    self.current_order.clone()
  }

  /// Takes the order being prepared, leaving none current
  pub fn done(&mut self) -> Option<OrderId> {
    self.current_order.take()
  }

  /// Drops a waiting order; false when it was not waiting here
  pub fn remove(&mut self, order_id: &OrderId) -> bool {
    let before = self.orders.len();
    self.orders.retain(|id| id != order_id);
    let removed = self.orders.len() != before;
    self.orders_changed |= removed;
    removed
  }

  pub fn waiting_count(&self) -> usize {
    self.orders.len()
  }

  /// True when the waiting list was modified since the queue was loaded
  pub fn orders_changed(&self) -> bool {
    self.orders_changed
  }

  pub fn change(&self) -> QueueChange {
    QueueChange {
      name: self.name.clone(),
      order_count: self.waiting_count(),
    }
  }
}

/// Published whenever a queue's waiting list changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueChange {
  pub name: String,
  pub order_count: usize,
}

/// Order rows written in the same transaction as a queue save
#[derive(Debug, Clone, Default)]
pub struct QueueWrite {
  pub new_order: Option<Order>,
  pub updated_orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(n: u8) -> OrderId {
    OrderId::parse(format!("202401011200000000{:02}", n)).unwrap()
  }

  #[test]
  fn test_dequeue_is_fifo() {
    let mut queue = Queue::new(Uuid::new_v4(), "Donut Hut");
    queue.enqueue(id(1));
    queue.enqueue(id(2));

    assert_eq!(queue.dequeue(), Some(id(1)));
    assert_eq!(queue.current_order, Some(id(1)));
    assert_eq!(queue.dequeue(), Some(id(2)));
    assert_eq!(queue.waiting_count(), 0);
  }

  #[test]
  fn test_dequeue_empty_clears_current() {
    let mut queue = Queue::restore(Uuid::new_v4(), Uuid::new_v4(), "q".into(), vec![], Some(id(7)), 3);

    assert_eq!(queue.dequeue(), None);
    assert_eq!(queue.current_order, None);
    assert!(!queue.orders_changed());
  }

  #[test]
  fn test_done_takes_current() {
    let mut queue = Queue::new(Uuid::new_v4(), "q");
    queue.enqueue(id(1));
    queue.dequeue();

    assert_eq!(queue.done(), Some(id(1)));
    assert_eq!(queue.current_order, None);
    assert_eq!(queue.done(), None);
  }

  #[test]
  fn test_remove_waiting_order() {
    let mut queue = Queue::restore(Uuid::new_v4(), Uuid::new_v4(), "q".into(), vec![id(1), id(2)], None, 0);

    assert!(queue.remove(&id(1)));
    assert!(!queue.remove(&id(9)));
    assert_eq!(queue.orders, VecDeque::from(vec![id(2)]));
    assert!(queue.orders_changed());
  }

  #[test]
  fn test_change_reports_waiting_count() {
    let mut queue = Queue::new(Uuid::new_v4(), "Donut Hut");
    queue.enqueue(id(1));
    queue.enqueue(id(2));

    assert_eq!(
      queue.change(),
      QueueChange {
        name: "Donut Hut".to_string(),
        order_count: 2
      }
    );
  }
}
