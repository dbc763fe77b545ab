pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::DetailResponse;
pub use errors::ApiError;
pub use middleware::{Authenticated, JwtAuthMiddleware, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{
  ConsumerRouteDependencies, OrderRouteDependencies, VendorRouteDependencies, configure_consumer_routes,
  configure_extractors, configure_health_routes, configure_order_routes, configure_vendor_routes,
};
