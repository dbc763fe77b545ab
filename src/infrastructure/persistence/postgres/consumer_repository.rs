use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::Email;
use crate::domain::consumer::{
  AnonymousConsumer, Consumer, ConsumerRepository, ContactDetails, SignedConsumer,
};
use crate::domain::errors::RepositoryError;

const KIND_ANONYMOUS: &str = "anonymous";
const KIND_SIGNED: &str = "signed";

#[derive(Debug, FromRow)]
struct ConsumerRow {
  id: Uuid,
  kind: String,
  email: Option<String>,
  phone: Option<String>,
  disabled: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ConsumerRow> for Consumer {
  type Error = RepositoryError;

  fn try_from(row: ConsumerRow) -> Result<Self, Self::Error> {
    match row.kind.as_str() {
      KIND_ANONYMOUS => Ok(Consumer::Anonymous(AnonymousConsumer {
        id: row.id,
        disabled: row.disabled,
        created_at: row.created_at,
      })),
      KIND_SIGNED => {
        let invalid = |e: String| RepositoryError::Serialization(format!("Invalid consumer {}: {}", row.id, e));
        let email = row
          .email
          .map(Email::new)
          .transpose()
          .map_err(|e| invalid(e.to_string()))?;
        let contact = ContactDetails::new(email, row.phone).map_err(|e| invalid(e.to_string()))?;

        Ok(Consumer::Signed(SignedConsumer {
          id: row.id,
          contact,
          disabled: row.disabled,
          created_at: row.created_at,
          updated_at: row.updated_at,
        }))
      }
      other => Err(RepositoryError::Serialization(format!(
        "Unknown consumer kind: {}",
        other
      ))),
    }
  }
}

/// Flattened column values of a consumer
struct ConsumerColumns<'a> {
  kind: &'static str,
  email: Option<&'a str>,
  phone: Option<&'a str>,
  disabled: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Consumer> for ConsumerColumns<'a> {
  fn from(consumer: &'a Consumer) -> Self {
    match consumer {
      Consumer::Anonymous(c) => ConsumerColumns {
        kind: KIND_ANONYMOUS,
        email: None,
        phone: None,
        disabled: c.disabled,
        created_at: c.created_at,
        updated_at: c.created_at,
      },
      Consumer::Signed(c) => ConsumerColumns {
        kind: KIND_SIGNED,
        email: c.contact.email().map(|e| e.as_str()),
        phone: c.contact.phone(),
        disabled: c.disabled,
        created_at: c.created_at,
        updated_at: c.updated_at,
      },
    }
  }
}

pub struct PostgresConsumerRepository {
  pool: PgPool,
}

impl PostgresConsumerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ConsumerRepository for PostgresConsumerRepository {
  async fn create(&self, consumer: Consumer) -> Result<Consumer, RepositoryError> {
    let columns = ConsumerColumns::from(&consumer);

    let row = sqlx::query_as::<_, ConsumerRow>(
      r#"
            INSERT INTO consumers (id, kind, email, phone, disabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, kind, email, phone, disabled, created_at, updated_at
            "#,
    )
    .bind(consumer.id())
    .bind(columns.kind)
    .bind(columns.email)
    .bind(columns.phone)
    .bind(columns.disabled)
    .bind(columns.created_at)
    .bind(columns.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Consumer>, RepositoryError> {
    let row = sqlx::query_as::<_, ConsumerRow>(
      r#"
            SELECT id, kind, email, phone, disabled, created_at, updated_at
            FROM consumers
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Consumer::try_from).transpose()
  }

  async fn update(&self, consumer: Consumer) -> Result<Consumer, RepositoryError> {
    let columns = ConsumerColumns::from(&consumer);

    let row = sqlx::query_as::<_, ConsumerRow>(
      r#"
            UPDATE consumers
            SET kind = $2, email = $3, phone = $4, disabled = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, kind, email, phone, disabled, created_at, updated_at
            "#,
    )
    .bind(consumer.id())
    .bind(columns.kind)
    .bind(columns.email)
    .bind(columns.phone)
    .bind(columns.disabled)
    .bind(columns.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }
}
