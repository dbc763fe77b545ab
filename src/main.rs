use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use donut_diaries::{
  adapters::http::{
    ConsumerRouteDependencies, OrderRouteDependencies, RequestIdMiddleware,
    VendorRouteDependencies, configure_consumer_routes, configure_extractors,
    configure_health_routes, configure_order_routes, configure_vendor_routes,
  },
  application::consumer::{
    CreateAnonymousConsumerUseCase, CreateSignedConsumerUseCase, GetCurrentConsumerUseCase,
    UpgradeConsumerUseCase,
  },
  application::order::{
    CancelOrderUseCase, CompleteCurrentOrderUseCase, ListConsumerOrdersUseCase,
    ListVendorOrdersUseCase, NextOrderUseCase, PlaceOrderUseCase,
  },
  application::vendor::{
    AddFoodUseCase, ChangeVendorStatusUseCase, CreateVendorUseCase, DeleteFoodUseCase,
    GetCurrentVendorUseCase, GetFoodUseCase, GetMenuUseCase, GetVendorByNameUseCase,
    UpdateFoodUseCase,
  },
  domain::auth::TokenVerifier,
  domain::consumer::ConsumerService,
  domain::order::{OrderService, QueueChangeHandler},
  domain::vendor::VendorService,
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresConsumerRepository, PostgresFoodRepository, PostgresOrderRepository,
      PostgresQueueRepository, PostgresVendorRepository,
    },
    realtime::{QueueChangeStream, WebsocketManager},
    security::JwtService,
    telemetry,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Load configuration
  let config = Config::load().map_err(|e| {
    eprintln!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;

  // Console and file logging; the guard flushes the file writer on exit
  let _log_guard = telemetry::init_tracing(&config.logging)?;

  tracing::info!("Starting Donut-Diaries API");
  tracing::debug!("Logging to {}", config.logging.file_path().display());

  let jwt_service = JwtService::new(&config.jwt).map_err(|e| {
    tracing::error!("Invalid JWT configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  let verifier: Arc<dyn TokenVerifier> = Arc::new(jwt_service);

  // Set up database connection pool with timeout
  let connect_options = config.database.connect_options().map_err(|e| {
    tracing::error!("Invalid database configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!(
    "Connecting to database {} on {}:{}",
    connect_options.get_database().unwrap_or_default(),
    connect_options.get_host(),
    connect_options.get_port()
  );

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect_with(connect_options),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  if config.database.run_migrations {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&db_pool).await.map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
    tracing::info!("Database migrations completed");
  }

  // Initialize repositories
  let vendor_repo = Arc::new(PostgresVendorRepository::new(db_pool.clone()));
  let food_repo = Arc::new(PostgresFoodRepository::new(db_pool.clone()));
  let consumer_repo = Arc::new(PostgresConsumerRepository::new(db_pool.clone()));
  let order_repo = Arc::new(PostgresOrderRepository::new(db_pool.clone()));
  let queue_repo = Arc::new(PostgresQueueRepository::new(db_pool.clone()));

  // Initialize domain services
  let vendor_service = Arc::new(VendorService::new(vendor_repo.clone(), food_repo.clone()));
  let consumer_service = Arc::new(ConsumerService::new(consumer_repo.clone()));
  let order_service = Arc::new(OrderService::new(
    order_repo,
    queue_repo,
    consumer_repo,
    vendor_repo,
    food_repo,
  ));

  // Initialize vendor use cases
  let create_vendor_use_case = Arc::new(CreateVendorUseCase::new(vendor_service.clone()));
  let get_current_vendor_use_case = Arc::new(GetCurrentVendorUseCase::new(vendor_service.clone()));
  let get_vendor_by_name_use_case = Arc::new(GetVendorByNameUseCase::new(vendor_service.clone()));
  let change_status_use_case = Arc::new(ChangeVendorStatusUseCase::new(vendor_service.clone()));
  let get_menu_use_case = Arc::new(GetMenuUseCase::new(vendor_service.clone()));
  let get_food_use_case = Arc::new(GetFoodUseCase::new(vendor_service.clone()));
  let add_food_use_case = Arc::new(AddFoodUseCase::new(vendor_service.clone()));
  let update_food_use_case = Arc::new(UpdateFoodUseCase::new(vendor_service.clone()));
  let delete_food_use_case = Arc::new(DeleteFoodUseCase::new(vendor_service));

  // Initialize consumer use cases
  let get_current_consumer_use_case =
    Arc::new(GetCurrentConsumerUseCase::new(consumer_service.clone()));
  let create_anonymous_use_case =
    Arc::new(CreateAnonymousConsumerUseCase::new(consumer_service.clone()));
  let create_signed_use_case = Arc::new(CreateSignedConsumerUseCase::new(consumer_service.clone()));
  let upgrade_consumer_use_case = Arc::new(UpgradeConsumerUseCase::new(consumer_service));

  // Initialize order use cases
  let place_order_use_case = Arc::new(PlaceOrderUseCase::new(order_service.clone()));
  let cancel_order_use_case = Arc::new(CancelOrderUseCase::new(order_service.clone()));
  let list_vendor_orders_use_case = Arc::new(ListVendorOrdersUseCase::new(order_service.clone()));
  let list_consumer_orders_use_case =
    Arc::new(ListConsumerOrdersUseCase::new(order_service.clone()));
  let next_order_use_case = Arc::new(NextOrderUseCase::new(order_service.clone()));
  let complete_order_use_case = Arc::new(CompleteCurrentOrderUseCase::new(order_service));

  // Live order counts: queue changes from the database are pushed to vendor sockets
  let websocket_manager = Arc::new(WebsocketManager::new());
  let change_stream = Arc::new(QueueChangeStream::new(db_pool.clone()));
  let change_task = {
    let change_stream = change_stream.clone();
    let handler: Arc<dyn QueueChangeHandler> = websocket_manager.clone();
    tokio::spawn(async move { change_stream.watch(handler).await })
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  let manager = websocket_manager.clone();

  // Create and start the HTTP server
  HttpServer::new(move || {
    let vendor_deps = VendorRouteDependencies {
      create_vendor: create_vendor_use_case.clone(),
      get_current_vendor: get_current_vendor_use_case.clone(),
      get_vendor_by_name: get_vendor_by_name_use_case.clone(),
      change_status: change_status_use_case.clone(),
      get_menu: get_menu_use_case.clone(),
      get_food: get_food_use_case.clone(),
      add_food: add_food_use_case.clone(),
      update_food: update_food_use_case.clone(),
      delete_food: delete_food_use_case.clone(),
      list_orders: list_vendor_orders_use_case.clone(),
      next_order: next_order_use_case.clone(),
      complete_order: complete_order_use_case.clone(),
      websocket_manager: manager.clone(),
    };
    let consumer_deps = ConsumerRouteDependencies {
      get_current_consumer: get_current_consumer_use_case.clone(),
      create_anonymous: create_anonymous_use_case.clone(),
      create_signed: create_signed_use_case.clone(),
      upgrade: upgrade_consumer_use_case.clone(),
      list_orders: list_consumer_orders_use_case.clone(),
    };
    let order_deps = OrderRouteDependencies {
      place_order: place_order_use_case.clone(),
      cancel_order: cancel_order_use_case.clone(),
    };
    let (vendor_verifier, consumer_verifier, order_verifier) =
      (verifier.clone(), verifier.clone(), verifier.clone());

    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .configure(configure_extractors)
      .configure(configure_health_routes)
      .service(
        web::scope("/api/vendor")
          .configure(move |cfg| configure_vendor_routes(cfg, vendor_deps, vendor_verifier)),
      )
      .service(
        web::scope("/api/consumer")
          .configure(move |cfg| configure_consumer_routes(cfg, consumer_deps, consumer_verifier)),
      )
      .service(
        web::scope("/api/order")
          .configure(move |cfg| configure_order_routes(cfg, order_deps, order_verifier)),
      )
  })
  .bind((server_host, server_port))?
  .run()
  .await?;

  // Stop the change feed before closing the sockets it feeds
  tracing::info!("Shutting down");
  change_stream.close();
  if let Err(e) = change_task.await {
    tracing::warn!("Queue change stream task failed: {}", e);
  }
  websocket_manager.shutdown().await;

  Ok(())
}
