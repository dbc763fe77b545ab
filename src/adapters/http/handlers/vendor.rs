use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::caller_id;
use crate::{
  adapters::http::{
    dtos::{
      ChangeStatusQuery, DetailResponse, FoodCreatePayload, FoodIdQuery, FoodOut, FoodUpdate,
      OrderOut, StatusUpdateOut, VendorCreate, VendorOut,
    },
    errors::ApiError,
    middleware::Authenticated,
  },
  application::{
    order::{
      CompleteCurrentOrderUseCase, ListVendorOrdersUseCase, NextOrderUseCase, VendorOrdersCommand,
    },
    vendor::*,
  },
};

/// Register the caller as a vendor
/// POST /api/vendor/new
pub async fn create_vendor_handler(
  Authenticated(claims): Authenticated,
  request: web::Json<VendorCreate>,
  use_case: web::Data<Arc<CreateVendorUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let command = CreateVendorCommand {
    vendor_id: caller_id(&claims)?,
    claim_email: claims.valid_email(),
    claim_phone: claims.phone().map(str::to_string),
    name: request.name,
    email: request.email,
    phone: request.phone,
    street: request.location.street,
    town: request.location.town,
    description: request.description,
    profile_picture: request.profile_picture,
    rating: request.rating,
    status: request.status,
    menu: request.menu.into_iter().map(FoodInput::from).collect(),
  };

  let vendor = use_case.execute(command).await?;
  tracing::info!("Vendor {} registered", vendor.id);

  Ok(HttpResponse::Created().json(VendorOut::from(vendor)))
}

/// GET /api/vendor
pub async fn get_current_vendor_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<GetCurrentVendorUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetCurrentVendorCommand {
    vendor_id: caller_id(&claims)?,
  };
  let vendor = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(VendorOut::from(vendor)))
}

/// Open or close the caller's shop
/// PATCH /api/vendor/change-status?new_status=Open
pub async fn change_status_handler(
  Authenticated(claims): Authenticated,
  query: web::Query<ChangeStatusQuery>,
  use_case: web::Data<Arc<ChangeVendorStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = ChangeVendorStatusCommand {
    vendor_id: caller_id(&claims)?,
    status: query.into_inner().new_status,
  };
  let vendor = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(StatusUpdateOut {
    detail: "status updated".to_string(),
    status: vendor.status.as_str().to_string(),
  }))
}

/// Add one food or a list of foods to the caller's menu
/// POST /api/vendor/menu
pub async fn add_food_handler(
  Authenticated(claims): Authenticated,
  request: web::Json<FoodCreatePayload>,
  use_case: web::Data<Arc<AddFoodUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let foods = request.into_inner().into_foods();
  for food in &foods {
    food.validate()?;
  }

  let command = AddFoodCommand {
    vendor_id: caller_id(&claims)?,
    foods: foods.into_iter().map(FoodInput::from).collect(),
  };
  let created = use_case.execute(command).await?;

  Ok(HttpResponse::Created().json(created.into_iter().map(FoodOut::from).collect::<Vec<_>>()))
}

/// PATCH /api/vendor/menu?food_id=
pub async fn update_food_handler(
  Authenticated(claims): Authenticated,
  query: web::Query<FoodIdQuery>,
  request: web::Json<FoodUpdate>,
  use_case: web::Data<Arc<UpdateFoodUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let command = UpdateFoodCommand {
    vendor_id: caller_id(&claims)?,
    food_id: query.food_id,
    name: request.name,
    description: request.description,
    picture: request.picture,
    price: request.price.map(|p| (p.amount, p.currency)),
    available: request.available,
    ttp: request.ttp,
    ingredients: request.ingredients,
    category: request.category,
  };
  let food = use_case.execute(command).await?;

  Ok(HttpResponse::Accepted().json(FoodOut::from(food)))
}

/// DELETE /api/vendor/menu?food_id=
pub async fn delete_food_handler(
  Authenticated(claims): Authenticated,
  query: web::Query<FoodIdQuery>,
  use_case: web::Data<Arc<DeleteFoodUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = DeleteFoodCommand {
    vendor_id: caller_id(&claims)?,
    food_id: query.food_id,
  };
  use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(DetailResponse::new("OK")))
}

/// GET /api/vendor/orders/all
pub async fn list_vendor_orders_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<ListVendorOrdersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = VendorOrdersCommand {
    vendor_id: caller_id(&claims)?,
  };
  let orders = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(orders.into_iter().map(OrderOut::from).collect::<Vec<_>>()))
}

/// Take the oldest waiting order; `null` when none is waiting
/// GET /api/vendor/orders/next
pub async fn next_order_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<NextOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = VendorOrdersCommand {
    vendor_id: caller_id(&claims)?,
  };
  let order = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(order.map(OrderOut::from)))
}

/// POST /api/vendor/orders/done
pub async fn complete_order_handler(
  Authenticated(claims): Authenticated,
  use_case: web::Data<Arc<CompleteCurrentOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = VendorOrdersCommand {
    vendor_id: caller_id(&claims)?,
  };
  let order = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(order.map(OrderOut::from)))
}

/// GET /api/vendor/{vendor_name}
pub async fn get_vendor_by_name_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<GetVendorByNameUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetVendorByNameCommand {
    name: path.into_inner(),
  };
  let vendor = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(VendorOut::from(vendor)))
}

/// GET /api/vendor/{vendor_name}/menu
pub async fn get_menu_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<GetMenuUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let command = GetMenuCommand {
    vendor_name: path.into_inner(),
  };
  let menu = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(menu.into_iter().map(FoodOut::from).collect::<Vec<_>>()))
}

/// GET /api/vendor/{vendor_name}/menu/{food_name}
pub async fn get_food_handler(
  path: web::Path<(String, String)>,
  use_case: web::Data<Arc<GetFoodUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (vendor_name, food_name) = path.into_inner();
  let food = use_case
    .execute(GetFoodCommand {
      vendor_name,
      food_name,
    })
    .await?;

  Ok(HttpResponse::Ok().json(FoodOut::from(food)))
}
