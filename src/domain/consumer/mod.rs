pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{AnonymousConsumer, Consumer, ContactDetails, SignedConsumer};
pub use errors::ConsumerError;
pub use ports::ConsumerRepository;
pub use services::ConsumerService;
