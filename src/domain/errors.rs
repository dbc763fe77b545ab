use thiserror::Error;

/// Errors raised by repository adapters, shared by every bounded context
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  /// Carries the violated constraint name when the database reports one
  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  /// The stored row changed since it was read
  #[error("Concurrent modification detected")]
  Conflict,

  #[error("Serialization failed: {0}")]
  Serialization(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

impl RepositoryError {
  /// True when this is a unique violation on the named constraint
  pub fn is_duplicate_of(&self, constraint: &str) -> bool {
    matches!(self, RepositoryError::DuplicateKey(name) if name == constraint)
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          let constraint = db_err.constraint().unwrap_or(db_err.message());
          RepositoryError::DuplicateKey(constraint.to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<serde_json::Error> for RepositoryError {
  fn from(error: serde_json::Error) -> Self {
    RepositoryError::Serialization(error.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_not_found_maps_to_not_found() {
    let error = RepositoryError::from(sqlx::Error::RowNotFound);
    assert!(matches!(error, RepositoryError::NotFound));
  }

  #[test]
  fn test_pool_errors_map_to_connection_failed() {
    assert!(matches!(
      RepositoryError::from(sqlx::Error::PoolTimedOut),
      RepositoryError::ConnectionFailed(_)
    ));
    assert!(matches!(
      RepositoryError::from(sqlx::Error::PoolClosed),
      RepositoryError::ConnectionFailed(_)
    ));
  }

  #[test]
  fn test_is_duplicate_of() {
    let error = RepositoryError::DuplicateKey("vendors_name_key".to_string());
    assert!(error.is_duplicate_of("vendors_name_key"));
    assert!(!error.is_duplicate_of("vendors_email_key"));
    assert!(!RepositoryError::NotFound.is_duplicate_of("vendors_name_key"));
  }
}
