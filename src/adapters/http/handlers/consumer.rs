use actix_web::{HttpResponse, web};
use std::sync::Arc;

use super::{caller_id, claim_email};
use crate::{
  adapters::http::{
    dtos::{ConsumerOut, OrderOut},
    errors::ApiError,
    middleware::Authenticated,
  },
  application::{
    consumer::*,
    order::{ConsumerOrdersCommand, ListConsumerOrdersUseCase},
  },
};

/// GET /api/consumer/me
pub async fn get_me_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<GetCurrentConsumerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetCurrentConsumerCommand {
    consumer_id: caller_id(&claims)?,
  };
  let consumer = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(ConsumerOut::from(consumer)))
}

/// POST /api/consumer/create/anonymous
pub async fn create_anonymous_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<CreateAnonymousConsumerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = CreateAnonymousConsumerCommand {
    consumer_id: caller_id(&claims)?,
  };
  let consumer = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(ConsumerOut::from(consumer)))
}

/// Contact details come from the token only
/// POST /api/consumer/create/signed
pub async fn create_signed_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<CreateSignedConsumerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = CreateSignedConsumerCommand {
    consumer_id: caller_id(&claims)?,
    email: claim_email(&claims)?,
    phone: claims.phone().map(str::to_string),
  };
  let consumer = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(ConsumerOut::from(consumer)))
}

/// Turn the caller's anonymous account into a signed one
/// POST /api/consumer/upgrade
pub async fn upgrade_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<UpgradeConsumerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = UpgradeConsumerCommand {
    consumer_id: caller_id(&claims)?,
    email: claim_email(&claims)?,
    phone: claims.phone().map(str::to_string),
  };
  let consumer = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(ConsumerOut::from(consumer)))
}

/// GET /api/consumer/orders
pub async fn list_my_orders_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<ListConsumerOrdersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = ConsumerOrdersCommand {
    consumer_id: caller_id(&claims)?,
  };
  let orders = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(orders.into_iter().map(OrderOut::from).collect::<Vec<_>>()))
}
