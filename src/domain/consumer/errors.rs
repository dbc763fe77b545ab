use thiserror::Error;

use crate::domain::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ConsumerError {
  #[error("Consumer not found.")]
  NotFound,

  #[error("Consumer already exists.")]
  AlreadyExists,

  #[error("Must provide email or phone")]
  MissingContact,

  #[error("Consumer is already signed.")]
  AlreadySigned,

  #[error("Email already in use.")]
  EmailTaken,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}
