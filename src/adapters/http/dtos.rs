use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::application::vendor::FoodInput;
use crate::domain::consumer::Consumer;
use crate::domain::order::Order;
use crate::domain::vendor::{Food, Price, Vendor};

/// Non-negative, at most 2 decimal places and small enough to store
fn storable_amount(value: &Decimal) -> Result<(), ValidationError> {
  Price::check_amount(*value)
    .map_err(|e| ValidationError::new("storable_amount").with_message(e.to_string().into()))
}

fn default_true() -> bool {
  true
}

/// Street address of a vendor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationIn {
  #[validate(length(min = 1, message = "Street is required"))]
  pub street: String,

  #[validate(length(min = 1, message = "Town is required"))]
  pub town: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PriceIn {
  #[validate(custom(function = "storable_amount"))]
  pub amount: Decimal,

  #[validate(length(min = 1, message = "Currency is required"))]
  pub currency: String,
}

/// A menu item in a vendor request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FoodCreate {
  #[validate(length(min = 1, max = 255, message = "Food name must be between 1 and 255 characters"))]
  pub name: String,

  #[serde(default)]
  pub description: Option<String>,

  /// Picture URLs
  #[serde(default)]
  pub picture: Option<Vec<String>>,

  #[validate(nested)]
  pub price: PriceIn,

  #[serde(default = "default_true")]
  pub available: bool,

  /// Minutes needed to prepare
  #[serde(default)]
  pub ttp: u32,

  #[serde(default)]
  pub ingredients: Option<Vec<String>>,

  #[serde(default)]
  pub category: Option<Vec<String>>,
}

impl From<FoodCreate> for FoodInput {
  fn from(food: FoodCreate) -> Self {
    FoodInput {
      name: food.name,
      description: food.description,
      picture: food.picture,
      price_amount: food.price.amount,
      price_currency: food.price.currency,
      available: food.available,
      ttp: food.ttp,
      ingredients: food.ingredients,
      category: food.category,
    }
  }
}

/// `POST /api/vendor/menu` accepts a single food or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FoodCreatePayload {
  One(FoodCreate),
  Many(Vec<FoodCreate>),
}

impl FoodCreatePayload {
  pub fn into_foods(self) -> Vec<FoodCreate> {
    match self {
      FoodCreatePayload::One(food) => vec![food],
      FoodCreatePayload::Many(foods) => foods,
    }
  }
}

/// Request for registering the caller as a vendor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorCreate {
  #[validate(length(min = 1, max = 255, message = "Vendor name must be between 1 and 255 characters"))]
  pub name: String,

  /// Ignored when the token carries a valid email
  #[validate(email(message = "Invalid email format"))]
  #[serde(default)]
  pub email: Option<String>,

  /// Ignored when the token carries a phone
  #[serde(default)]
  pub phone: Option<String>,

  #[validate(nested)]
  pub location: LocationIn,

  #[serde(default)]
  pub description: Option<String>,

  #[validate(url(message = "Invalid profile picture URL"))]
  #[serde(default)]
  pub profile_picture: Option<String>,

  #[serde(default)]
  pub rating: Decimal,

  /// `Open` or `Closed`; defaults to `Closed`
  #[serde(default)]
  pub status: Option<String>,

  #[validate(nested)]
  #[serde(default)]
  pub menu: Vec<FoodCreate>,
}

/// Partial food update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FoodUpdate {
  #[validate(length(min = 1, max = 255, message = "Food name must be between 1 and 255 characters"))]
  pub name: Option<String>,

  pub description: Option<String>,

  pub picture: Option<Vec<String>>,

  #[validate(nested)]
  pub price: Option<PriceIn>,

  pub available: Option<bool>,

  pub ttp: Option<u32>,

  pub ingredients: Option<Vec<String>>,

  pub category: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusQuery {
  pub new_status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodIdQuery {
  pub food_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodItemIn {
  pub food_id: Uuid,

  #[validate(range(min = 1, message = "Quantity must be at least 1"))]
  pub quantity: u32,
}

/// Request for placing an order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
  pub vendor_id: Uuid,

  #[validate(length(min = 1, message = "Order must contain at least one food"), nested)]
  pub foods: Vec<FoodItemIn>,

  #[validate(custom(function = "storable_amount"))]
  pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationOut {
  pub street: String,
  pub town: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorOut {
  pub id: Uuid,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  pub location: LocationOut,
  pub description: Option<String>,
  pub profile_picture: Option<String>,
  #[serde(with = "rust_decimal::serde::float")]
  pub rating: Decimal,
  pub status: String,
  /// Food ids in menu order
  pub menu: Vec<Uuid>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Vendor> for VendorOut {
  fn from(vendor: Vendor) -> Self {
    VendorOut {
      id: vendor.id,
      name: vendor.name.into_inner(),
      email: vendor.email.map(|e| e.into_inner()),
      phone: vendor.phone,
      location: LocationOut {
        street: vendor.location.street,
        town: vendor.location.town,
      },
      description: vendor.description,
      profile_picture: vendor.profile_picture,
      rating: vendor.rating.value(),
      status: vendor.status.as_str().to_string(),
      menu: vendor.menu,
      created_at: vendor.created_at,
      updated_at: vendor.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceOut {
  #[serde(with = "rust_decimal::serde::float")]
  pub amount: Decimal,
  pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodOut {
  pub id: Uuid,
  pub vendor_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub picture: Option<Vec<String>>,
  pub price: PriceOut,
  pub available: bool,
  pub ttp: u32,
  pub ingredients: Option<Vec<String>>,
  pub category: Option<Vec<String>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Food> for FoodOut {
  fn from(food: Food) -> Self {
    FoodOut {
      id: food.id,
      vendor_id: food.vendor_id,
      name: food.name.into_inner(),
      description: food.description,
      picture: food.picture,
      price: PriceOut {
        amount: food.price.amount,
        currency: food.price.currency,
      },
      available: food.available,
      ttp: food.ttp,
      ingredients: food.ingredients,
      category: food.category,
      created_at: food.created_at,
      updated_at: food.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodItemOut {
  pub food_id: Uuid,
  pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderOut {
  pub id: String,
  pub vendor_id: Uuid,
  pub consumer_id: Uuid,
  pub foods: Vec<FoodItemOut>,
  #[serde(with = "rust_decimal::serde::float")]
  pub total_price: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderOut {
  fn from(order: Order) -> Self {
    OrderOut {
      id: order.id.into_inner(),
      vendor_id: order.vendor_id,
      consumer_id: order.consumer_id,
      foods: order
        .foods
        .into_iter()
        .map(|item| FoodItemOut {
          food_id: item.food_id,
          quantity: item.quantity,
        })
        .collect(),
      total_price: order.total_price,
      status: order.status.as_str().to_string(),
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumerOut {
  pub id: Uuid,
  pub is_anonymous: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  pub disabled: bool,
  pub created_at: DateTime<Utc>,
}

impl From<Consumer> for ConsumerOut {
  fn from(consumer: Consumer) -> Self {
    match consumer {
      Consumer::Anonymous(c) => ConsumerOut {
        id: c.id,
        is_anonymous: true,
        email: None,
        phone: None,
        disabled: c.disabled,
        created_at: c.created_at,
      },
      Consumer::Signed(c) => ConsumerOut {
        id: c.id,
        is_anonymous: false,
        email: c.contact.email().map(|e| e.as_str().to_string()),
        phone: c.contact.phone().map(str::to_string),
        disabled: c.disabled,
        created_at: c.created_at,
      },
    }
  }
}

/// Response to a vendor status change
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateOut {
  pub detail: String,
  pub status: String,
}

/// `{"detail": ...}` body used for errors and bare acknowledgements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
  pub detail: String,
}

impl DetailResponse {
  pub fn new(detail: impl Into<String>) -> Self {
    Self {
      detail: detail.into(),
    }
  }
}
