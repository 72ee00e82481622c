//! Error type for `brigade-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE or foreign-key constraint rejected the write at commit time —
  /// typically a race lost against another writer after the service-level
  /// pre-check passed. The transaction has been rolled back.
  #[error("constraint violated: {0}")]
  Constraint(String),

  /// The target row of an update vanished between the service's existence
  /// check and the write.
  #[error("{entity} with id {id} no longer exists")]
  RowMissing { entity: &'static str, id: i64 },

  /// A stored column value could not be decoded into its domain type.
  #[error("corrupt column value: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classify a database failure, pulling constraint violations out into
/// [`Error::Constraint`].
pub(crate) fn classify(err: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, ref message)) =
    err
    && code.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Error::Constraint(
      message.clone().unwrap_or_else(|| "constraint violation".to_string()),
    );
  }
  Error::Database(err)
}
