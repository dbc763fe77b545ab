use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::ImageExt;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};
use uuid::Uuid;

use crate::domain::auth::Email;
use crate::domain::vendor::{
  Food, FoodName, Location, NewFood, Price, Rating, Vendor, VendorName, VendorProfile, VendorStatus,
};

/// Starts a throwaway Postgres and applies the migrations.
/// Keep the container alive for as long as the pool is used.
pub async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
  let container = Postgres::default()
    .with_tag("16-alpine")
    .start()
    .await
    .expect("Failed to start postgres container");

  let host = container.get_host().await.expect("Failed to get host");
  let port = container
    .get_host_port_ipv4(5432)
    .await
    .expect("Failed to get port");
  let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

  let pool = PgPoolOptions::new()
    .max_connections(5)
    .connect(&database_url)
    .await
    .expect("Failed to connect to test database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  (pool, container)
}

pub fn sample_vendor(name: &str, email: &str) -> Vendor {
  Vendor::new(
    Uuid::new_v4(),
    VendorProfile {
      name: VendorName::new(name).unwrap(),
      email: Some(Email::new(email).unwrap()),
      phone: Some("0712345678".into()),
      location: Location::new("Moi Avenue", "Nairobi").unwrap(),
      description: None,
      profile_picture: None,
      rating: Rating::default(),
      status: VendorStatus::Closed,
    },
  )
  .unwrap()
}

pub fn sample_food(vendor_id: Uuid, name: &str, amount: Decimal) -> Food {
  Food::new(
    vendor_id,
    NewFood {
      name: FoodName::new(name).unwrap(),
      description: Some("Fresh".into()),
      picture: None,
      price: Price::new(amount, "Ksh").unwrap(),
      available: true,
      ttp: 5,
      ingredients: None,
      category: Some(vec!["cake".into()]),
    },
  )
}
