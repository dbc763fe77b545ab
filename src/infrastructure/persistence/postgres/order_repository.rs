use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::order::{FoodItem, Order, OrderId, OrderRepository, OrderStatus};

#[derive(Debug, FromRow)]
struct OrderRow {
  id: String,
  vendor_id: Uuid,
  consumer_id: Uuid,
  foods: Json<Vec<FoodItem>>,
  total_price: Decimal,
  status: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = RepositoryError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    let id = OrderId::parse(&row.id).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    let status = row
      .status
      .parse::<OrderStatus>()
      .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    Ok(Order {
      id,
      vendor_id: row.vendor_id,
      consumer_id: row.consumer_id,
      foods: row.foods.0,
      total_price: row.total_price,
      status,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub(super) async fn insert_order(conn: &mut PgConnection, order: &Order) -> Result<(), RepositoryError> {
  sqlx::query(
    r#"
        INSERT INTO orders (id, vendor_id, consumer_id, foods, total_price, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
  )
  .bind(order.id.as_str())
  .bind(order.vendor_id)
  .bind(order.consumer_id)
  .bind(Json(&order.foods))
  .bind(order.total_price)
  .bind(order.status.as_str())
  .bind(order.created_at)
  .bind(order.updated_at)
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub(super) async fn update_order_status(conn: &mut PgConnection, order: &Order) -> Result<(), RepositoryError> {
  let result = sqlx::query(
    r#"
        UPDATE orders
        SET status = $2, updated_at = $3
        WHERE id = $1
        "#,
  )
  .bind(order.id.as_str())
  .bind(order.status.as_str())
  .bind(order.updated_at)
  .execute(&mut *conn)
  .await?;

  if result.rows_affected() == 0 {
    return Err(RepositoryError::NotFound);
  }
  Ok(())
}

pub struct PostgresOrderRepository {
  pool: PgPool,
}

impl PostgresOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
  async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
      r#"
            SELECT id, vendor_id, consumer_id, foods, total_price, status, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
    )
    .bind(id.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(Order::try_from).transpose()
  }

  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(
      r#"
            SELECT id, vendor_id, consumer_id, foods, total_price, status, created_at, updated_at
            FROM orders
            WHERE vendor_id = $1
            ORDER BY id
            "#,
    )
    .bind(vendor_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
  }

  async fn find_by_consumer(&self, consumer_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(
      r#"
            SELECT id, vendor_id, consumer_id, foods, total_price, status, created_at, updated_at
            FROM orders
            WHERE consumer_id = $1
            ORDER BY id
            "#,
    )
    .bind(consumer_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
  }
}
