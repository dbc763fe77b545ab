use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::order::{QueueChange, QueueChangeHandler};

/// Mandatory extension; sent to a socket displaced by a newer one with the same name
pub const DUPLICATE_CONNECTION_CODE: u16 = 1010;
pub const DUPLICATE_CONNECTION_REASON: &str = "WM: Duplicate connection";

/// Going away; sent to every socket on shutdown
pub const SHUTDOWN_CODE: u16 = 1001;
pub const SHUTDOWN_REASON: &str = "WM: Shutdown";

#[derive(Debug, Error)]
#[error("Websocket connection closed")]
pub struct ConnectionClosed;

/// The sending half of an accepted websocket
#[async_trait]
pub trait WsConnection: Send {
  async fn send_text(&mut self, text: String) -> Result<(), ConnectionClosed>;

  async fn close(&mut self, code: u16, reason: String);
}

type SharedConnection = Arc<Mutex<Box<dyn WsConnection>>>;

#[derive(Clone)]
struct Entry {
  id: Uuid,
  conn: SharedConnection,
}

/// Named registry of live websocket connections.
///
/// Names are unique: vendors connect under their own name so queue changes
/// can be routed to them. The registry lock is never held while a socket is
/// written to; each connection has its own lock.
#[derive(Default)]
pub struct WebsocketManager {
  connections: Mutex<HashMap<String, Entry>>,
}

impl WebsocketManager {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `conn` under `name`, closing any connection already there.
  /// Returns the id of the new registration.
  pub async fn connect(&self, name: &str, conn: Box<dyn WsConnection>) -> Uuid {
    let id = Uuid::new_v4();
    let entry = Entry {
      id,
      conn: Arc::new(Mutex::new(conn)),
    };
    let previous = self.connections.lock().await.insert(name.to_string(), entry);

    if let Some(previous) = previous {
      tracing::info!("Replacing duplicate websocket connection: {}", name);
      previous
        .conn
        .lock()
        .await
        .close(DUPLICATE_CONNECTION_CODE, DUPLICATE_CONNECTION_REASON.to_string())
        .await;
    }

    id
  }

  /// Closes and forgets the connection under `name`
  pub async fn close(&self, name: &str) {
    let entry = self.connections.lock().await.remove(name);
    if let Some(entry) = entry {
      entry
        .conn
        .lock()
        .await
        .close(DUPLICATE_CONNECTION_CODE, DUPLICATE_CONNECTION_REASON.to_string())
        .await;
    }
  }

  /// Forgets the connection under `name` without closing it
  pub async fn remove_connection(&self, name: &str) {
    self.connections.lock().await.remove(name);
  }

  /// Forgets the connection under `name` only if it is still registration `id`.
  /// A socket replaced by a duplicate must not evict its successor when it ends.
  pub async fn remove_connection_if(&self, name: &str, id: Uuid) -> bool {
    let mut connections = self.connections.lock().await;
    match connections.get(name) {
      Some(entry) if entry.id == id => {
        connections.remove(name);
        true
      }
      _ => false,
    }
  }

  /// Sends `message` to the connection under `name`; a failed send drops it.
  pub async fn send_personal_message(&self, message: &str, name: &str) -> bool {
    let entry = self.connections.lock().await.get(name).cloned();
    let Some(entry) = entry else {
      tracing::warn!("Invalid connection: {}", name);
      return false;
    };

    let sent = entry.conn.lock().await.send_text(message.to_string()).await;
    match sent {
      Ok(()) => true,
      Err(e) => {
        tracing::debug!("Dropping websocket {}: {}", name, e);
        self.remove_connection_if(name, entry.id).await;
        false
      }
    }
  }

  /// Sends `message` to every connection, dropping those that fail
  pub async fn broadcast(&self, message: &str) {
    let entries: Vec<(String, Entry)> = self
      .connections
      .lock()
      .await
      .iter()
      .map(|(name, entry)| (name.clone(), entry.clone()))
      .collect();

    for (name, entry) in entries {
      let sent = entry.conn.lock().await.send_text(message.to_string()).await;
      if sent.is_err() {
        tracing::debug!("Dropping websocket {}", name);
        self.remove_connection_if(&name, entry.id).await;
      }
    }
  }

  /// Pushes the waiting-order count to the vendor connected under the queue's name
  pub async fn send_new_order_message(&self, change: &QueueChange) -> bool {
    tracing::info!("Sending message to {}: {}", change.name, change.order_count);
    self
      .send_personal_message(&change.order_count.to_string(), &change.name)
      .await
  }

  /// Closes and removes every connection
  pub async fn shutdown(&self) {
    let entries: Vec<(String, Entry)> = self.connections.lock().await.drain().collect();
    tracing::info!("Shutting down websocket manager ({} connections)", entries.len());

    for (_, entry) in entries {
      entry
        .conn
        .lock()
        .await
        .close(SHUTDOWN_CODE, SHUTDOWN_REASON.to_string())
        .await;
    }
  }

  pub async fn connection_count(&self) -> usize {
    self.connections.lock().await.len()
  }
}

#[async_trait]
impl QueueChangeHandler for WebsocketManager {
  async fn on_change(&self, change: QueueChange) {
    self.send_new_order_message(&change).await;
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use std::sync::Mutex as StdMutex;
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq)]
  pub(crate) enum Event {
    Text(String),
    Closed(u16, String),
  }

  /// Records what the manager does to a socket
  #[derive(Clone, Default)]
  pub(crate) struct FakeConnection {
    pub events: Arc<StdMutex<Vec<Event>>>,
    pub broken: bool,
  }

  impl FakeConnection {
    pub fn broken() -> Self {
      Self {
        broken: true,
        ..Default::default()
      }
    }

    pub fn events(&self) -> Vec<Event> {
      self.events.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl WsConnection for FakeConnection {
    async fn send_text(&mut self, text: String) -> Result<(), ConnectionClosed> {
      if self.broken {
        return Err(ConnectionClosed);
      }
      self.events.lock().unwrap().push(Event::Text(text));
      Ok(())
    }

    async fn close(&mut self, code: u16, reason: String) {
      self.events.lock().unwrap().push(Event::Closed(code, reason));
    }
  }

  /// A socket whose sends never complete, like a peer that stopped reading
  struct StalledConnection;

  #[async_trait]
  impl WsConnection for StalledConnection {
    async fn send_text(&mut self, _text: String) -> Result<(), ConnectionClosed> {
      std::future::pending().await
    }

    async fn close(&mut self, _code: u16, _reason: String) {}
  }

  #[tokio::test]
  async fn test_duplicate_name_closes_older_connection() {
    let manager = WebsocketManager::new();
    let first = FakeConnection::default();
    let second = FakeConnection::default();

    manager.connect("Donut Hut", Box::new(first.clone())).await;
    manager.connect("Donut Hut", Box::new(second.clone())).await;

    assert_eq!(
      first.events(),
      vec![Event::Closed(1010, "WM: Duplicate connection".into())]
    );
    assert!(second.events().is_empty());
    assert_eq!(manager.connection_count().await, 1);

    assert!(manager.send_personal_message("3", "Donut Hut").await);
    assert_eq!(second.events(), vec![Event::Text("3".into())]);
  }

  #[tokio::test]
  async fn test_replaced_socket_cannot_remove_successor() {
    let manager = WebsocketManager::new();
    let old_id = manager
      .connect("Donut Hut", Box::new(FakeConnection::default()))
      .await;
    let new_id = manager
      .connect("Donut Hut", Box::new(FakeConnection::default()))
      .await;

    assert!(!manager.remove_connection_if("Donut Hut", old_id).await);
    assert_eq!(manager.connection_count().await, 1);
    assert!(manager.remove_connection_if("Donut Hut", new_id).await);
    assert_eq!(manager.connection_count().await, 0);
  }

  #[tokio::test]
  async fn test_message_to_unknown_name_is_ignored() {
    let manager = WebsocketManager::new();
    assert!(!manager.send_personal_message("1", "nobody").await);
  }

  #[tokio::test]
  async fn test_failed_send_drops_connection() {
    let manager = WebsocketManager::new();
    manager.connect("Donut Hut", Box::new(FakeConnection::broken())).await;

    assert!(!manager.send_personal_message("1", "Donut Hut").await);
    assert_eq!(manager.connection_count().await, 0);
  }

  #[tokio::test]
  async fn test_broadcast_skips_and_drops_broken() {
    let manager = WebsocketManager::new();
    let healthy = FakeConnection::default();
    manager.connect("a", Box::new(healthy.clone())).await;
    manager.connect("b", Box::new(FakeConnection::broken())).await;

    manager.broadcast("hello").await;

    assert_eq!(healthy.events(), vec![Event::Text("hello".into())]);
    assert_eq!(manager.connection_count().await, 1);
  }

  #[tokio::test]
  async fn test_close_and_remove() {
    let manager = WebsocketManager::new();
    let closed = FakeConnection::default();
    let removed = FakeConnection::default();
    manager.connect("a", Box::new(closed.clone())).await;
    manager.connect("b", Box::new(removed.clone())).await;

    manager.close("a").await;
    manager.remove_connection("b").await;
    manager.close("missing").await;

    assert_eq!(closed.events().len(), 1);
    assert!(removed.events().is_empty());
    assert_eq!(manager.connection_count().await, 0);
  }

  #[tokio::test]
  async fn test_queue_change_sends_order_count() {
    let manager = WebsocketManager::new();
    let vendor = FakeConnection::default();
    let other = FakeConnection::default();
    manager.connect("Donut Hut", Box::new(vendor.clone())).await;
    manager.connect("Bagel Barn", Box::new(other.clone())).await;

    manager
      .on_change(QueueChange {
        name: "Donut Hut".into(),
        order_count: 4,
      })
      .await;

    assert_eq!(vendor.events(), vec![Event::Text("4".into())]);
    assert!(other.events().is_empty());
  }

  #[tokio::test]
  async fn test_shutdown_closes_everything() {
    let manager = WebsocketManager::new();
    let a = FakeConnection::default();
    let b = FakeConnection::default();
    manager.connect("a", Box::new(a.clone())).await;
    manager.connect("b", Box::new(b.clone())).await;

    manager.shutdown().await;

    assert_eq!(a.events(), vec![Event::Closed(1001, "WM: Shutdown".into())]);
    assert_eq!(b.events(), vec![Event::Closed(1001, "WM: Shutdown".into())]);
    assert_eq!(manager.connection_count().await, 0);
  }

  #[tokio::test]
  async fn test_stalled_send_does_not_block_registry() {
    let manager = Arc::new(WebsocketManager::new());
    manager.connect("Slow Bakery", Box::new(StalledConnection)).await;

    let sending = {
      let manager = manager.clone();
      tokio::spawn(async move { manager.send_personal_message("1", "Slow Bakery").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let other = FakeConnection::default();
    let other_id = tokio::time::timeout(
      Duration::from_millis(500),
      manager.connect("Donut Hut", Box::new(other.clone())),
    )
    .await
    .expect("connect waited on another socket's send");
    let delivered = tokio::time::timeout(
      Duration::from_millis(500),
      manager.send_personal_message("2", "Donut Hut"),
    )
    .await
    .expect("send waited on another socket's send");
    assert!(delivered);
    assert_eq!(other.events(), vec![Event::Text("2".into())]);

    let removed = tokio::time::timeout(
      Duration::from_millis(500),
      manager.remove_connection_if("Donut Hut", other_id),
    )
    .await
    .expect("removal waited on another socket's send");
    assert!(removed);

    sending.abort();
  }
}
