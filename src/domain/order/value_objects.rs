use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueObjectError {
  #[error("Invalid order id: {0}")]
  InvalidOrderId(String),

  #[error("Unknown order status: {0}")]
  UnknownStatus(String),

  #[error("Quantity must be at least 1")]
  InvalidQuantity,

  #[error("Order total cannot exceed {0}")]
  TotalTooLarge(rust_decimal::Decimal),
}

/// Order id: the UTC creation instant down to the microsecond, `YYYYMMDDhhmmssffffff`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
  const LENGTH: usize = 20;

  pub fn generate() -> Self {
    Self(Utc::now().format("%Y%m%d%H%M%S%6f").to_string())
  }

  pub fn parse(value: impl AsRef<str>) -> Result<Self, ValueObjectError> {
    let value = value.as_ref();
    if value.len() != Self::LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
      return Err(ValueObjectError::InvalidOrderId(value.to_string()));
    }
    Ok(Self(value.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Waiting,
  Processing,
  Completed,
  Canceled,
}

impl OrderStatus {
  pub fn can_transition_to(&self, new_status: OrderStatus) -> bool {
    matches!(
      (self, new_status),
      (OrderStatus::Waiting, OrderStatus::Processing)
        | (OrderStatus::Waiting, OrderStatus::Canceled)
        | (OrderStatus::Processing, OrderStatus::Completed)
    )
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Waiting => "waiting",
      OrderStatus::Processing => "processing",
      OrderStatus::Completed => "completed",
      OrderStatus::Canceled => "canceled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "waiting" => Ok(OrderStatus::Waiting),
      "processing" => Ok(OrderStatus::Processing),
      "completed" => Ok(OrderStatus::Completed),
      "canceled" => Ok(OrderStatus::Canceled),
      _ => Err(ValueObjectError::UnknownStatus(s.to_string())),
    }
  }
}
