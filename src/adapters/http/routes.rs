use actix_web::web;
use std::sync::Arc;

use crate::application::consumer::{
  CreateAnonymousConsumerUseCase, CreateSignedConsumerUseCase, GetCurrentConsumerUseCase,
  UpgradeConsumerUseCase,
};
use crate::application::order::{
  CancelOrderUseCase, CompleteCurrentOrderUseCase, ListConsumerOrdersUseCase,
  ListVendorOrdersUseCase, NextOrderUseCase, PlaceOrderUseCase,
};
use crate::application::vendor::{
  AddFoodUseCase, ChangeVendorStatusUseCase, CreateVendorUseCase, DeleteFoodUseCase,
  GetCurrentVendorUseCase, GetFoodUseCase, GetMenuUseCase, GetVendorByNameUseCase,
  UpdateFoodUseCase,
};
use crate::domain::auth::TokenVerifier;
use crate::infrastructure::realtime::WebsocketManager;

use super::errors::{json_error_handler, path_error_handler, query_error_handler};
use super::handlers::{consumer, health, order, vendor, websocket};
use super::middleware::JwtAuthMiddleware;

/// Use cases and shared state behind `/api/vendor`
pub struct VendorRouteDependencies {
  pub create_vendor: Arc<CreateVendorUseCase>,
  pub get_current_vendor: Arc<GetCurrentVendorUseCase>,
  pub get_vendor_by_name: Arc<GetVendorByNameUseCase>,
  pub change_status: Arc<ChangeVendorStatusUseCase>,
  pub get_menu: Arc<GetMenuUseCase>,
  pub get_food: Arc<GetFoodUseCase>,
  pub add_food: Arc<AddFoodUseCase>,
  pub update_food: Arc<UpdateFoodUseCase>,
  pub delete_food: Arc<DeleteFoodUseCase>,
  pub list_orders: Arc<ListVendorOrdersUseCase>,
  pub next_order: Arc<NextOrderUseCase>,
  pub complete_order: Arc<CompleteCurrentOrderUseCase>,
  pub websocket_manager: Arc<WebsocketManager>,
}

/// Use cases behind `/api/consumer`
pub struct ConsumerRouteDependencies {
  pub get_current_consumer: Arc<GetCurrentConsumerUseCase>,
  pub create_anonymous: Arc<CreateAnonymousConsumerUseCase>,
  pub create_signed: Arc<CreateSignedConsumerUseCase>,
  pub upgrade: Arc<UpgradeConsumerUseCase>,
  pub list_orders: Arc<ListConsumerOrdersUseCase>,
}

/// Use cases behind `/api/order`
pub struct OrderRouteDependencies {
  pub place_order: Arc<PlaceOrderUseCase>,
  pub cancel_order: Arc<CancelOrderUseCase>,
}

/// Public endpoints: `GET /` and `GET /health`
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(health::root_handler))
    .route("/health", web::get().to(health::health_handler));
}

/// Extractor settings so malformed bodies, queries and paths answer 422 `{"detail"}`
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler));
}

/// Configure vendor routes
///
/// Mount under `/api/vendor`. Fixed paths are registered before the
/// `{vendor_name}` ones so a vendor named e.g. `menu` cannot shadow them.
///
/// # Routes
///
/// - GET /, POST /new, PATCH /change-status (authenticated)
/// - POST, PATCH, DELETE /menu (authenticated)
/// - GET /orders/all, GET /orders/next, POST /orders/done (authenticated)
/// - GET /{vendor_name}, GET /{vendor_name}/menu, GET /{vendor_name}/menu/{food_name}
/// - GET /{vendor_name}/ws/order-count (websocket)
pub fn configure_vendor_routes(
  cfg: &mut web::ServiceConfig,
  deps: VendorRouteDependencies,
  verifier: Arc<dyn TokenVerifier>,
) {
  let auth = JwtAuthMiddleware::new(verifier);

  cfg
    .app_data(web::Data::new(deps.create_vendor))
    .app_data(web::Data::new(deps.get_current_vendor))
    .app_data(web::Data::new(deps.get_vendor_by_name))
    .app_data(web::Data::new(deps.change_status))
    .app_data(web::Data::new(deps.get_menu))
    .app_data(web::Data::new(deps.get_food))
    .app_data(web::Data::new(deps.add_food))
    .app_data(web::Data::new(deps.update_food))
    .app_data(web::Data::new(deps.delete_food))
    .app_data(web::Data::new(deps.list_orders))
    .app_data(web::Data::new(deps.next_order))
    .app_data(web::Data::new(deps.complete_order))
    .app_data(web::Data::new(deps.websocket_manager));

  // Authenticated routes
  cfg
    .service(
      web::resource("")
        .wrap(auth.clone())
        .route(web::get().to(vendor::get_current_vendor_handler)),
    )
    .service(
      web::resource("/new")
        .wrap(auth.clone())
        .route(web::post().to(vendor::create_vendor_handler)),
    )
    .service(
      web::resource("/change-status")
        .wrap(auth.clone())
        .route(web::patch().to(vendor::change_status_handler)),
    )
    .service(
      web::resource("/menu")
        .wrap(auth.clone())
        .route(web::post().to(vendor::add_food_handler))
        .route(web::patch().to(vendor::update_food_handler))
        .route(web::delete().to(vendor::delete_food_handler)),
    )
    .service(
      web::resource("/orders/all")
        .wrap(auth.clone())
        .route(web::get().to(vendor::list_vendor_orders_handler)),
    )
    .service(
      web::resource("/orders/next")
        .wrap(auth.clone())
        .route(web::get().to(vendor::next_order_handler)),
    )
    .service(
      web::resource("/orders/done")
        .wrap(auth)
        .route(web::post().to(vendor::complete_order_handler)),
    );

  // Public routes
  cfg
    .route(
      "/{vendor_name}/ws/order-count",
      web::get().to(websocket::order_count_ws_handler),
    )
    .route("/{vendor_name}/menu", web::get().to(vendor::get_menu_handler))
    .route(
      "/{vendor_name}/menu/{food_name}",
      web::get().to(vendor::get_food_handler),
    )
    .route("/{vendor_name}", web::get().to(vendor::get_vendor_by_name_handler));
}

/// Configure consumer routes, mounted under `/api/consumer`. All require a bearer token.
pub fn configure_consumer_routes(
  cfg: &mut web::ServiceConfig,
  deps: ConsumerRouteDependencies,
  verifier: Arc<dyn TokenVerifier>,
) {
  cfg
    .app_data(web::Data::new(deps.get_current_consumer))
    .app_data(web::Data::new(deps.create_anonymous))
    .app_data(web::Data::new(deps.create_signed))
    .app_data(web::Data::new(deps.upgrade))
    .app_data(web::Data::new(deps.list_orders))
    .service(
      web::scope("")
        .wrap(JwtAuthMiddleware::new(verifier))
        .route("/me", web::get().to(consumer::get_me_handler))
        .route(
          "/create/anonymous",
          web::post().to(consumer::create_anonymous_handler),
        )
        .route("/create/signed", web::post().to(consumer::create_signed_handler))
        .route("/upgrade", web::post().to(consumer::upgrade_handler))
        .route("/orders", web::get().to(consumer::list_my_orders_handler)),
    );
}

/// Configure order routes, mounted under `/api/order`. All require a bearer token.
pub fn configure_order_routes(
  cfg: &mut web::ServiceConfig,
  deps: OrderRouteDependencies,
  verifier: Arc<dyn TokenVerifier>,
) {
  cfg
    .app_data(web::Data::new(deps.place_order))
    .app_data(web::Data::new(deps.cancel_order))
    .service(
      web::scope("")
        .wrap(JwtAuthMiddleware::new(verifier))
        .route("", web::post().to(order::place_order_handler))
        .route("/{order_id}/cancel", web::patch().to(order::cancel_order_handler)),
    );
}
