use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::errors::RepositoryError;
use crate::domain::vendor::{Food, FoodName, FoodRepository, Price};

#[derive(Debug, FromRow)]
struct FoodRow {
  id: Uuid,
  vendor_id: Uuid,
  name: String,
  description: Option<String>,
  picture: Option<Vec<String>>,
  price_amount: Decimal,
  price_currency: String,
  available: bool,
  ttp: i32,
  ingredients: Option<Vec<String>>,
  category: Option<Vec<String>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<FoodRow> for Food {
  type Error = RepositoryError;

  fn try_from(row: FoodRow) -> Result<Self, Self::Error> {
    let invalid = |e: String| RepositoryError::Serialization(format!("Invalid food {}: {}", row.id, e));

    let name = FoodName::new(&row.name).map_err(|e| invalid(e.to_string()))?;
    let price = Price::new(row.price_amount, &row.price_currency).map_err(|e| invalid(e.to_string()))?;
    let ttp = u32::try_from(row.ttp).map_err(|e| invalid(e.to_string()))?;

    Ok(Food {
      id: row.id,
      vendor_id: row.vendor_id,
      name,
      description: row.description,
      picture: row.picture,
      price,
      available: row.available,
      ttp,
      ingredients: row.ingredients,
      category: row.category,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn ttp_column(food: &Food) -> Result<i32, RepositoryError> {
  i32::try_from(food.ttp)
    .map_err(|_| RepositoryError::Serialization(format!("ttp {} out of range", food.ttp)))
}

/// Inserts a food at the end of its vendor's menu, inside the caller's transaction
pub(super) async fn insert_food(conn: &mut PgConnection, food: &Food) -> Result<(), RepositoryError> {
  sqlx::query(
    r#"
        INSERT INTO foods (id, vendor_id, name, description, picture, price_amount, price_currency,
                           available, ttp, ingredients, category, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
  )
  .bind(food.id)
  .bind(food.vendor_id)
  .bind(food.name.as_str())
  .bind(food.description.as_deref())
  .bind(food.picture.as_deref())
  .bind(food.price.amount)
  .bind(&food.price.currency)
  .bind(food.available)
  .bind(ttp_column(food)?)
  .bind(food.ingredients.as_deref())
  .bind(food.category.as_deref())
  .bind(food.created_at)
  .bind(food.updated_at)
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub struct PostgresFoodRepository {
  pool: PgPool,
}

impl PostgresFoodRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl FoodRepository for PostgresFoodRepository {
  async fn create_many(&self, foods: Vec<Food>) -> Result<Vec<Food>, RepositoryError> {
    let mut tx = self.pool.begin().await?;
    for food in &foods {
      insert_food(&mut tx, food).await?;
    }
    tx.commit().await?;

    Ok(foods)
  }

  async fn find_by_id(&self, vendor_id: Uuid, food_id: Uuid) -> Result<Option<Food>, RepositoryError> {
    let row = sqlx::query_as::<_, FoodRow>(
      r#"
            SELECT id, vendor_id, name, description, picture, price_amount, price_currency,
                   available, ttp, ingredients, category, created_at, updated_at
            FROM foods
            WHERE vendor_id = $1 AND id = $2
            "#,
    )
    .bind(vendor_id)
    .bind(food_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Food::try_from).transpose()
  }

  async fn find_by_name(&self, vendor_id: Uuid, name: &str) -> Result<Option<Food>, RepositoryError> {
    let row = sqlx::query_as::<_, FoodRow>(
      r#"
            SELECT id, vendor_id, name, description, picture, price_amount, price_currency,
                   available, ttp, ingredients, category, created_at, updated_at
            FROM foods
            WHERE vendor_id = $1 AND name = $2
            ORDER BY position
            LIMIT 1
            "#,
    )
    .bind(vendor_id)
    .bind(name)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Food::try_from).transpose()
  }

  async fn find_many(&self, vendor_id: Uuid, ids: &[Uuid]) -> Result<Vec<Food>, RepositoryError> {
    let rows = sqlx::query_as::<_, FoodRow>(
      r#"
            SELECT id, vendor_id, name, description, picture, price_amount, price_currency,
                   available, ttp, ingredients, category, created_at, updated_at
            FROM foods
            WHERE vendor_id = $1 AND id = ANY($2)
            ORDER BY position
            "#,
    )
    .bind(vendor_id)
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Food::try_from).collect()
  }

  async fn find_by_vendor(&self, vendor_id: Uuid) -> Result<Vec<Food>, RepositoryError> {
    let rows = sqlx::query_as::<_, FoodRow>(
      r#"
            SELECT id, vendor_id, name, description, picture, price_amount, price_currency,
                   available, ttp, ingredients, category, created_at, updated_at
            FROM foods
            WHERE vendor_id = $1
            ORDER BY position
            "#,
    )
    .bind(vendor_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Food::try_from).collect()
  }

  async fn update(&self, food: Food) -> Result<Food, RepositoryError> {
    let row = sqlx::query_as::<_, FoodRow>(
      r#"
            UPDATE foods
            SET name = $3, description = $4, picture = $5, price_amount = $6, price_currency = $7,
                available = $8, ttp = $9, ingredients = $10, category = $11, updated_at = $12
            WHERE vendor_id = $1 AND id = $2
            RETURNING id, vendor_id, name, description, picture, price_amount, price_currency,
                      available, ttp, ingredients, category, created_at, updated_at
            "#,
    )
    .bind(food.vendor_id)
    .bind(food.id)
    .bind(food.name.as_str())
    .bind(food.description.as_deref())
    .bind(food.picture.as_deref())
    .bind(food.price.amount)
    .bind(&food.price.currency)
    .bind(food.available)
    .bind(ttp_column(&food)?)
    .bind(food.ingredients.as_deref())
    .bind(food.category.as_deref())
    .bind(food.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn delete(&self, vendor_id: Uuid, food_id: Uuid) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM foods WHERE vendor_id = $1 AND id = $2")
      .bind(vendor_id)
      .bind(food_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }
}
