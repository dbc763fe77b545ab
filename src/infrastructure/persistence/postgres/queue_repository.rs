use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use super::order_repository::{insert_order, update_order_status};
use crate::domain::errors::RepositoryError;
use crate::domain::order::{OrderId, Queue, QueueRepository, QueueWrite};

/// NOTIFY channel carrying `QueueChange` payloads as JSON
pub const QUEUE_CHANGES_CHANNEL: &str = "queue_changes";

#[derive(Debug, FromRow)]
struct QueueRow {
  id: Uuid,
  vendor_id: Uuid,
  name: String,
  orders: Vec<String>,
  current_order_id: Option<String>,
  version: i64,
}

impl TryFrom<QueueRow> for Queue {
  type Error = RepositoryError;

  fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
    let parse = |id: &str| OrderId::parse(id).map_err(|e| RepositoryError::Serialization(e.to_string()));

    let orders = row
      .orders
      .iter()
      .map(|id| parse(id))
      .collect::<Result<Vec<_>, _>>()?;
    let current_order = row.current_order_id.as_deref().map(parse).transpose()?;

    Ok(Queue::restore(
      row.id,
      row.vendor_id,
      row.name,
      orders,
      current_order,
      row.version,
    ))
  }
}

fn order_columns(queue: &Queue) -> Vec<String> {
  queue.orders.iter().map(|id| id.as_str().to_string()).collect()
}

pub(super) async fn insert_queue(conn: &mut PgConnection, queue: &Queue) -> Result<(), RepositoryError> {
  sqlx::query(
    r#"
        INSERT INTO queues (id, vendor_id, name, orders, current_order_id, version)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
  )
  .bind(queue.id)
  .bind(queue.vendor_id)
  .bind(&queue.name)
  .bind(order_columns(queue))
  .bind(queue.current_order.as_ref().map(|id| id.as_str()))
  .bind(queue.version)
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub struct PostgresQueueRepository {
  pool: PgPool,
}

impl PostgresQueueRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl QueueRepository for PostgresQueueRepository {
  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Option<Queue>, RepositoryError> {
    let row = sqlx::query_as::<_, QueueRow>(
      r#"
            SELECT id, vendor_id, name, orders, current_order_id, version
            FROM queues
            WHERE vendor_id = $1
            "#,
    )
    .bind(vendor_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Queue::try_from).transpose()
  }

  /// Writes the order rows, then the queue guarded by its version, then the
  /// change notification. NOTIFY is only delivered if the transaction commits.
  async fn save(&self, queue: &Queue, write: QueueWrite) -> Result<Queue, RepositoryError> {
    let mut tx = self.pool.begin().await?;

    if let Some(order) = &write.new_order {
      insert_order(&mut tx, order).await?;
    }
    for order in &write.updated_orders {
      update_order_status(&mut tx, order).await?;
    }

    let row = sqlx::query_as::<_, QueueRow>(
      r#"
            UPDATE queues
            SET orders = $3, current_order_id = $4, version = version + 1, updated_at = NOW()
            WHERE vendor_id = $1 AND version = $2
            RETURNING id, vendor_id, name, orders, current_order_id, version
            "#,
    )
    .bind(queue.vendor_id)
    .bind(queue.version)
    .bind(order_columns(queue))
    .bind(queue.current_order.as_ref().map(|id| id.as_str()))
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
      tx.rollback().await?;
      return Err(RepositoryError::Conflict);
    };

    if queue.orders_changed() {
      let payload = serde_json::to_string(&queue.change())?;
      sqlx::query("SELECT pg_notify($1, $2)")
        .bind(QUEUE_CHANGES_CHANNEL)
        .bind(payload)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    row.try_into()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::consumer::{Consumer, ConsumerRepository};
  use crate::domain::order::{FoodItem, Order, OrderRepository, OrderStatus};
  use crate::domain::vendor::VendorRepository;
  use crate::infrastructure::persistence::postgres::test_db::{sample_food, sample_vendor, setup_test_db};
  use crate::infrastructure::persistence::postgres::{
    PostgresConsumerRepository, PostgresOrderRepository, PostgresVendorRepository,
  };
  use rust_decimal_macros::dec;

  struct Seeded {
    vendor_id: Uuid,
    consumer_id: Uuid,
    food_id: Uuid,
  }

  async fn seed(pool: &PgPool) -> Seeded {
    let vendor = sample_vendor("Donut Hut", "hut@example.com");
    let vendor_id = vendor.id;
    let food = sample_food(vendor_id, "Glazed", dec!(100));
    let food_id = food.id;
    PostgresVendorRepository::new(pool.clone())
      .create(vendor, vec![food], Queue::new(vendor_id, "Donut Hut"))
      .await
      .unwrap();

    let consumer = PostgresConsumerRepository::new(pool.clone())
      .create(Consumer::anonymous(Uuid::new_v4()))
      .await
      .unwrap();

    Seeded {
      vendor_id,
      consumer_id: consumer.id(),
      food_id,
    }
  }

  fn order(seeded: &Seeded) -> Order {
    Order::new(
      seeded.vendor_id,
      seeded.consumer_id,
      vec![FoodItem {
        food_id: seeded.food_id,
        quantity: 2,
      }],
      dec!(200),
    )
  }

  #[tokio::test]
  async fn test_enqueue_stores_order_and_bumps_version() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let queues = PostgresQueueRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool);

    let mut queue = queues.find_by_vendor(seeded.vendor_id).await.unwrap().unwrap();
    let new_order = order(&seeded);
    queue.enqueue(new_order.id.clone());

    let saved = queues
      .save(
        &queue,
        QueueWrite {
          new_order: Some(new_order.clone()),
          updated_orders: vec![],
        },
      )
      .await
      .unwrap();

    assert_eq!(saved.version, queue.version + 1);
    assert_eq!(saved.orders.front(), Some(&new_order.id));

    let stored = orders.find_by_id(&new_order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Waiting);
    assert_eq!(stored.foods, new_order.foods);
    assert_eq!(stored.total_price, dec!(200));
    assert_eq!(orders.find_by_vendor(seeded.vendor_id).await.unwrap().len(), 1);
    assert_eq!(orders.find_by_consumer(seeded.consumer_id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_stale_version_is_rejected_without_side_effects() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let queues = PostgresQueueRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool);

    let first_read = queues.find_by_vendor(seeded.vendor_id).await.unwrap().unwrap();
    let mut second_read = first_read.clone();

    let mut winner = first_read;
    let winning_order = order(&seeded);
    winner.enqueue(winning_order.id.clone());
    queues
      .save(
        &winner,
        QueueWrite {
          new_order: Some(winning_order),
          updated_orders: vec![],
        },
      )
      .await
      .unwrap();

    let mut losing_order = order(&seeded);
    losing_order.id = OrderId::parse("20000101000000000001").unwrap();
    second_read.enqueue(losing_order.id.clone());
    let result = queues
      .save(
        &second_read,
        QueueWrite {
          new_order: Some(losing_order.clone()),
          updated_orders: vec![],
        },
      )
      .await;

    assert!(matches!(result, Err(RepositoryError::Conflict)));
    assert!(orders.find_by_id(&losing_order.id).await.unwrap().is_none());
    let queue = queues.find_by_vendor(seeded.vendor_id).await.unwrap().unwrap();
    assert_eq!(queue.waiting_count(), 1);
  }

  #[tokio::test]
  async fn test_dequeue_updates_order_status() {
    let (pool, _container) = setup_test_db().await;
    let seeded = seed(&pool).await;
    let queues = PostgresQueueRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool);

    let mut queue = queues.find_by_vendor(seeded.vendor_id).await.unwrap().unwrap();
    let mut placed = order(&seeded);
    queue.enqueue(placed.id.clone());
    let mut queue = queues
      .save(
        &queue,
        QueueWrite {
          new_order: Some(placed.clone()),
          updated_orders: vec![],
        },
      )
      .await
      .unwrap();

    queue.dequeue();
    placed.transition_to(OrderStatus::Processing).unwrap();
    let saved = queues
      .save(
        &queue,
        QueueWrite {
          new_order: None,
          updated_orders: vec![placed.clone()],
        },
      )
      .await
      .unwrap();

    assert_eq!(saved.current_order, Some(placed.id.clone()));
    assert_eq!(saved.waiting_count(), 0);
    let stored = orders.find_by_id(&placed.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Processing);
  }

  #[tokio::test]
  async fn test_save_without_queue_is_conflict() {
    let (pool, _container) = setup_test_db().await;
    let queues = PostgresQueueRepository::new(pool);

    let orphan = Queue::new(Uuid::new_v4(), "Nowhere");
    let result = queues.save(&orphan, QueueWrite::default()).await;
    assert!(matches!(result, Err(RepositoryError::Conflict)));
  }
}
