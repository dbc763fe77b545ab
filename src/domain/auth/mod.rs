pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

pub use entities::AuthClaims;
pub use errors::AuthError;
pub use ports::TokenVerifier;
pub use value_objects::{Email, ValueObjectError};
