pub mod consumer_repository;
pub mod food_repository;
pub mod order_repository;
pub mod queue_repository;
pub mod vendor_repository;

#[cfg(test)]
pub(crate) mod test_db;

pub use consumer_repository::PostgresConsumerRepository;
pub use food_repository::PostgresFoodRepository;
pub use order_repository::PostgresOrderRepository;
pub use queue_repository::{PostgresQueueRepository, QUEUE_CHANGES_CHANNEL};
pub use vendor_repository::PostgresVendorRepository;
