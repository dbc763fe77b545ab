use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::food_repository::insert_food;
use super::queue_repository::insert_queue;
use crate::domain::auth::Email;
use crate::domain::errors::RepositoryError;
use crate::domain::order::Queue;
use crate::domain::vendor::{
  Food, Location, Rating, Vendor, VendorName, VendorRepository, VendorStatus,
};

const VENDOR_COLUMNS: &str = r#"
  v.id, v.name, v.email, v.phone, v.street, v.town, v.description, v.profile_picture,
  v.rating, v.status, v.created_at, v.updated_at,
  ARRAY(SELECT f.id FROM foods f WHERE f.vendor_id = v.id ORDER BY f.position) AS menu
"#;

#[derive(Debug, FromRow)]
struct VendorRow {
  id: Uuid,
  name: String,
  email: Option<String>,
  phone: Option<String>,
  street: String,
  town: String,
  description: Option<String>,
  profile_picture: Option<String>,
  rating: Decimal,
  status: String,
  menu: Vec<Uuid>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for Vendor {
  type Error = RepositoryError;

  fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
    let id = row.id;
    let invalid = move |e: &dyn std::fmt::Display| {
      RepositoryError::Serialization(format!("Invalid vendor {}: {}", id, e))
    };

    let name = VendorName::new(&row.name).map_err(|e| invalid(&e))?;
    let email = row
      .email
      .as_deref()
      .map(Email::new)
      .transpose()
      .map_err(|e| invalid(&e))?;
    let location = Location::new(&row.street, &row.town).map_err(|e| invalid(&e))?;
    let rating = Rating::new(row.rating).map_err(|e| invalid(&e))?;
    let status = row.status.parse::<VendorStatus>().map_err(|e| invalid(&e))?;

    Ok(Vendor {
      id: row.id,
      name,
      email,
      phone: row.phone,
      location,
      description: row.description,
      profile_picture: row.profile_picture,
      rating,
      status,
      menu: row.menu,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresVendorRepository {
  pool: PgPool,
}

impl PostgresVendorRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl VendorRepository for PostgresVendorRepository {
  async fn create(&self, vendor: Vendor, menu: Vec<Food>, queue: Queue) -> Result<Vendor, RepositoryError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
            INSERT INTO vendors (id, name, email, phone, street, town, description, profile_picture,
                                 rating, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
    )
    .bind(vendor.id)
    .bind(vendor.name.as_str())
    .bind(vendor.email.as_ref().map(|e| e.as_str()))
    .bind(vendor.phone.as_deref())
    .bind(&vendor.location.street)
    .bind(&vendor.location.town)
    .bind(vendor.description.as_deref())
    .bind(vendor.profile_picture.as_deref())
    .bind(vendor.rating.value())
    .bind(vendor.status.as_str())
    .bind(vendor.created_at)
    .bind(vendor.updated_at)
    .execute(&mut *tx)
    .await?;

    for food in &menu {
      insert_food(&mut tx, food).await?;
    }
    insert_queue(&mut tx, &queue).await?;

    tx.commit().await?;

    self.find_by_id(vendor.id).await?.ok_or(RepositoryError::NotFound)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Vendor>, RepositoryError> {
    let sql = format!("SELECT {} FROM vendors v WHERE v.id = $1", VENDOR_COLUMNS);
    let row = sqlx::query_as::<_, VendorRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;

    row.map(Vendor::try_from).transpose()
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<Vendor>, RepositoryError> {
    let sql = format!("SELECT {} FROM vendors v WHERE v.name = $1", VENDOR_COLUMNS);
    let row = sqlx::query_as::<_, VendorRow>(&sql)
      .bind(name)
      .fetch_optional(&self.pool)
      .await?;

    row.map(Vendor::try_from).transpose()
  }

  async fn update_status(&self, id: Uuid, status: VendorStatus) -> Result<Vendor, RepositoryError> {
    let result = sqlx::query(
      r#"
            UPDATE vendors
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
    )
    .bind(id)
    .bind(status.as_str())
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(RepositoryError::NotFound);
    }

    self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
  }
}
