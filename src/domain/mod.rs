pub mod auth;
pub mod consumer;
pub mod errors;
pub mod order;
pub mod vendor;

pub use errors::RepositoryError;
