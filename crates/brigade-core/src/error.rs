//! Error taxonomy for `brigade-core`.
//!
//! Every failure a service can raise is typed and carries enough context
//! (field name, entity type, identifier) for the boundary layer to render a
//! structured message. The core never retries.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field-level constraint violations, keyed by field name.
///
/// A `BTreeMap` keeps iteration order deterministic so rendered error bodies
/// are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_insert_with(|| message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// `Ok(())` when no violation was collected, otherwise `Err(self)`.
  pub fn into_result(self) -> Result<(), ValidationErrors> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A globally-unique field collides with an existing record.
  #[error("{message}")]
  AlreadyExists { field: String, message: String },

  /// A lookup by id/uuid/referenced-id found nothing.
  #[error("{message}")]
  NotFound { entity: &'static str, message: String },

  /// Structural/field-level violations detected before the uniqueness guard.
  #[error("validation failed")]
  Validation(ValidationErrors),

  /// Password hashing failed.
  #[error("password hashing failed: {0}")]
  Hash(String),

  /// The underlying store rejected an operation the core did not anticipate,
  /// e.g. a race lost against a uniqueness constraint at commit time.
  #[error("store error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn already_exists(field: &str, message: impl Into<String>) -> Self {
    Error::AlreadyExists { field: field.to_string(), message: message.into() }
  }

  pub fn not_found(entity: &'static str, message: impl Into<String>) -> Self {
    Error::NotFound { entity, message: message.into() }
  }

  pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Storage(Box::new(source))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Error::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
