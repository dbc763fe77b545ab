use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::caller_id;
use crate::{
  adapters::http::{
    dtos::{OrderCreate, OrderOut},
    errors::ApiError,
    middleware::Authenticated,
  },
  application::order::*,
};

/// POST /api/order
pub async fn place_order_handler(
  Authenticated(claims): Authenticated,
  request: web::Json<OrderCreate>,
  use_case: web::Data<Arc<PlaceOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let command = PlaceOrderCommand {
    consumer_id: caller_id(&claims)?,
    vendor_id: request.vendor_id,
    foods: request
      .foods
      .into_iter()
      .map(|item| (item.food_id, item.quantity))
      .collect(),
    total_price: request.total_price,
  };
  let order = use_case.execute(command).await?;
  tracing::info!("Order {} placed with vendor {}", order.id, order.vendor_id);

  Ok(HttpResponse::Created().json(OrderOut::from(order)))
}

/// PATCH /api/order/{order_id}/cancel
pub async fn cancel_order_handler(
  Authenticated(claims): Authenticated,
  path: web::Path<String>,
  use_case: web::Data<Arc<CancelOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = CancelOrderCommand {
    consumer_id: caller_id(&claims)?,
    order_id: path.into_inner(),
  };
  let order = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(OrderOut::from(order)))
}
